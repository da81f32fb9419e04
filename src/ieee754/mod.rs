//! Bit-level helpers for IEEE-754 binary64 values.
//! Contains the total-order key transform and integer conversion tricks.

pub mod convert;
pub mod order_key;

pub use convert::{u64_to_f64_split, SIGN_BIT};
pub use order_key::{
    double_key, double_key_unsigned, key_to_double, sort_total, unsigned_key_to_double,
};
