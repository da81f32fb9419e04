//! Utility helpers for the `limbscan` kernels.
//! Holds the process-wide parallelism switch shared by every substrate call.

pub mod parallel;

pub use parallel::{
    hardware_concurrency, join, parallelism_enabled, set_parallelism, ParallelismGuard,
};
