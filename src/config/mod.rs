//! Kernel configuration shared by every parallel entry point.
//!
//! The configuration only carries scheduling knobs. It never changes the
//! result of a kernel: the same input produces bit-identical output for every
//! valid grain and worker count.

use core::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::partition::range::IndexRange;
use crate::{KernelError, KernelResult};

/// Chunk size used when the caller does not supply one.
pub const DEFAULT_GRAIN: usize = 1024;

const DEFAULT_GRAIN_NONZERO: NonZeroUsize = match NonZeroUsize::new(DEFAULT_GRAIN) {
    Some(grain) => grain,
    None => panic!("DEFAULT_GRAIN must be nonzero"),
};

/// The range `[0, len)` at [`DEFAULT_GRAIN`].
pub(crate) fn default_range(len: usize) -> IndexRange {
    IndexRange::prefix(len, DEFAULT_GRAIN_NONZERO)
}

/// Scheduling parameters for a kernel invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Minimum chunk width the substrate subdivides to. Must be at least 1.
    pub grain: usize,
    /// Size of a dedicated worker pool. `0` runs on the global pool, which is
    /// sized to the hardware concurrency.
    #[serde(default)]
    pub worker_threads: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRAIN)
    }
}

impl KernelConfig {
    /// Creates a configuration running on the global pool.
    pub const fn new(grain: usize) -> Self {
        Self {
            grain,
            worker_threads: 0,
        }
    }

    /// Returns a copy using a dedicated pool of `worker_threads` threads.
    pub const fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    /// Checks the invariants documented on the fields.
    pub fn validate(&self) -> KernelResult<()> {
        if self.grain == 0 {
            return Err(KernelError::InvalidGrain);
        }
        Ok(())
    }

    /// Builds the index range `[0, len)` carrying this configuration's grain.
    pub fn range(&self, len: usize) -> KernelResult<IndexRange> {
        IndexRange::new(0, len, self.grain)
    }

    /// Number of worker threads a kernel will run on.
    pub fn effective_threads(&self) -> usize {
        if !crate::utils::parallelism_enabled() {
            1
        } else if self.worker_threads == 0 {
            crate::utils::hardware_concurrency()
        } else {
            self.worker_threads
        }
    }

    /// Runs `op` on the pool selected by this configuration.
    #[cfg(feature = "parallel")]
    pub fn install<R, F>(&self, op: F) -> KernelResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.validate()?;
        tracing::debug!(
            grain = self.grain,
            threads = self.effective_threads(),
            dedicated = self.worker_threads > 0,
            "installing kernel"
        );
        if self.worker_threads == 0 {
            return Ok(op());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_threads)
            .thread_name(|index| format!("limbscan-worker-{index}"))
            .build()
            .map_err(|err| KernelError::PoolBuild(err.to_string()))?;
        Ok(pool.install(op))
    }

    /// Runs `op` on the calling thread.
    #[cfg(not(feature = "parallel"))]
    pub fn install<R, F>(&self, op: F) -> KernelResult<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.validate()?;
        tracing::debug!(grain = self.grain, threads = 1, "installing kernel");
        Ok(op())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_documented_grain() {
        let config = KernelConfig::default();
        assert_eq!(config.grain, DEFAULT_GRAIN);
        assert_eq!(config.worker_threads, 0);
        assert!(config.effective_threads() >= 1);
    }

    #[test]
    fn zero_grain_is_rejected() {
        let config = KernelConfig::new(0);
        assert_eq!(config.validate(), Err(KernelError::InvalidGrain));
        assert_eq!(config.range(16), Err(KernelError::InvalidGrain));
        assert_eq!(config.install(|| 1), Err(KernelError::InvalidGrain));
    }

    #[test]
    fn serde_json_roundtrip_ok() {
        let config = KernelConfig::new(256).with_worker_threads(3);
        let encoded = serde_json::to_string(&config).expect("serialize");
        assert_eq!(encoded, r#"{"grain":256,"worker_threads":3}"#);
        let decoded: KernelConfig = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, config);
    }

    #[test]
    fn worker_threads_defaults_when_absent() {
        let decoded: KernelConfig = serde_json::from_str(r#"{"grain":64}"#).expect("deserialize");
        assert_eq!(decoded, KernelConfig::new(64));
    }

    #[test]
    fn effective_threads_follow_pool_and_switch() {
        let _lock = crate::utils::parallel::lock_toggle();
        let dedicated = KernelConfig::new(8).with_worker_threads(3);
        let global = KernelConfig::new(8);
        if cfg!(feature = "parallel") {
            assert_eq!(dedicated.effective_threads(), 3);
            assert_eq!(
                global.effective_threads(),
                crate::utils::hardware_concurrency()
            );
        }
        let _guard = crate::utils::set_parallelism(false);
        assert_eq!(dedicated.effective_threads(), 1);
        assert_eq!(global.effective_threads(), 1);
    }

    #[test]
    fn dedicated_pool_runs_operation() {
        let config = KernelConfig::new(8).with_worker_threads(2);
        assert_eq!(config.install(|| 40 + 2), Ok(42));
    }
}
