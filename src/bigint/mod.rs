//! Multi-precision arithmetic over little-endian 64-bit limb arrays.
//!
//! A limb array `[l0, l1, ..., l(n-1)]` denotes `sum l(i) * 2^(64 i)`; `l0` is
//! the least significant limb.

pub mod bulk_add;
pub mod limbs;

pub use bulk_add::{
    parallel_bulk_add, parallel_bulk_add_assign, parallel_bulk_add_assign_with,
    parallel_bulk_add_with, BulkAddReport,
};
pub use limbs::{add_1, add_n, add_n_assign, popcount, LIMB_BITS};
