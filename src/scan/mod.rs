//! Prefix-scan kernels built on [`crate::partition::scan`].

pub mod horner;
pub mod prefix;

pub use horner::{
    exponentiate, horner_serial, parallel_scan_horner, parallel_scan_horner_with, HornerScan,
};
pub use prefix::{prefix_sum_exclusive, prefix_sum_inclusive};
