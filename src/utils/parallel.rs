//! Process-wide switch between the rayon pool and serial execution.
//!
//! The substrate consults the switch at every split. Turning it off never
//! changes the chunk tree, only where the chunks run, so kernel output is the
//! same in both modes.

#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
static RAYON_DISPATCH: AtomicBool = AtomicBool::new(true);

/// Returns the number of hardware threads, falling back to one.
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

/// Whether substrate splits are currently handed to `rayon::join`.
#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    RAYON_DISPATCH.load(Ordering::SeqCst)
}

/// Always `false` without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Switches chunk dispatch on or off until the returned guard is dropped.
///
/// The switch is global to the process. Callers that flip it concurrently
/// must serialize among themselves or the restore order is unspecified.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    ParallelismGuard {
        restore: RAYON_DISPATCH.swap(enabled, Ordering::SeqCst),
    }
}

/// No-op without the `parallel` feature; every kernel already runs serially.
#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

/// Restores the dispatch mode that was active before [`set_parallelism`].
#[must_use = "dropping the guard immediately restores the previous mode"]
pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    restore: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        RAYON_DISPATCH.store(self.restore, Ordering::SeqCst);
    }
}

/// Runs both closures, potentially in parallel, and returns both results.
///
/// With parallelism disabled the left closure runs to completion before the
/// right one starts, on the calling thread.
#[cfg(feature = "parallel")]
pub fn join<A, B, RA, RB>(left: A, right: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    if parallelism_enabled() {
        rayon::join(left, right)
    } else {
        (left(), right())
    }
}

#[cfg(not(feature = "parallel"))]
pub fn join<A, B, RA, RB>(left: A, right: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    (left(), right())
}

/// Serializes unit tests that flip or depend on the dispatch switch.
#[cfg(test)]
pub(crate) fn lock_toggle() -> std::sync::MutexGuard<'static, ()> {
    static TOGGLE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    TOGGLE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
