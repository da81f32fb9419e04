//! Core library entry point for `limbscan`.
//!
//! The crate bundles three data-parallel kernels over caller-borrowed arrays
//! together with the work-partitioning substrate they run on:
//!
//! * [`scan::horner`] rewrites an array in place with the running Horner fold
//!   `A[i] = sum_{j <= i} m^(i - j) * A[j]` using a two-pass parallel scan.
//! * [`bigint::bulk_add`] adds two little-endian limb arrays chunk by chunk and
//!   resolves inter-chunk carries in a serial fix-up pass.
//! * [`ieee754::order_key`] maps doubles to integers whose natural order
//!   refines floating-point comparison.
//!
//! All kernels borrow their inputs for the duration of the call only. The
//! substrate lives in [`partition`]; it splits an [`IndexRange`] into chunks of
//! roughly `grain` elements and dispatches them on the rayon pool (feature
//! `parallel`) or serially on the calling thread.

use core::fmt;

#[macro_use]
pub mod contract;

pub mod bigint;
pub mod config;
pub mod ieee754;
pub mod partition;
pub mod scan;
pub mod utils;

pub use bigint::bulk_add::{parallel_bulk_add, parallel_bulk_add_assign, BulkAddReport};
pub use config::{KernelConfig, DEFAULT_GRAIN};
pub use ieee754::order_key::{double_key, double_key_unsigned, key_to_double};
pub use partition::range::IndexRange;
pub use partition::scan::{parallel_scan, parallel_scan_with, ScanBody, ScanChunk, ScanPass};
pub use partition::{
    parallel_for, parallel_for_mut, parallel_reduce, try_parallel_for, try_parallel_for_mut,
    try_parallel_reduce,
};
pub use scan::horner::{parallel_scan_horner, HornerScan};

/// Result type used throughout the library for recoverable failures.
pub type KernelResult<T> = core::result::Result<T, KernelError>;

/// Recoverable error surfaced by range construction and kernel configuration.
///
/// Contract violations inside a running kernel are not represented here; they
/// abort through [`contract_assert!`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// A grain size of zero was requested.
    InvalidGrain,
    /// The range end lies before its beginning.
    InvertedRange {
        /// Requested first index.
        begin: usize,
        /// Requested one-past-last index.
        end: usize,
    },
    /// The dedicated worker pool could not be started.
    PoolBuild(String),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::InvalidGrain => write!(f, "grain size must be at least 1"),
            KernelError::InvertedRange { begin, end } => {
                write!(f, "range end {end} precedes begin {begin}")
            }
            KernelError::PoolBuild(reason) => write!(f, "failed to build worker pool: {reason}"),
        }
    }
}

impl std::error::Error for KernelError {}
