//! Parallel Horner scan.
//!
//! Rewrites `A` in place so that `A[i] = sum_{j <= i} m^(i - j) * A[j]` with
//! wrapping 64-bit arithmetic, i.e. the running value of
//! `s := m * s + A[i]`. The combiner is not commutative: composing a left
//! state `L` with a right state `R` that folded `n` terms gives
//! `m^n * L + R`, so every state carries its term count.

use crate::config::{default_range, KernelConfig};
use crate::partition::scan::{parallel_scan, ScanBody, ScanChunk};
use crate::KernelResult;

/// Scan worker for the Horner recurrence under a fixed multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HornerScan {
    multiplier: u64,
    sum: u64,
    terms: u64,
}

impl HornerScan {
    /// Creates a worker with the identity state (`sum = 0`, no terms).
    pub const fn new(multiplier: u64) -> Self {
        Self {
            multiplier,
            sum: 0,
            terms: 0,
        }
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// Accumulated value of every term folded so far.
    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Number of input elements folded so far.
    pub fn terms(&self) -> u64 {
        self.terms
    }
}

impl ScanBody<u64> for HornerScan {
    fn split(&self) -> Self {
        Self::new(self.multiplier)
    }

    fn apply(&mut self, mut chunk: ScanChunk<'_, u64>) {
        for index in 0..chunk.len() {
            self.sum = self
                .multiplier
                .wrapping_mul(self.sum)
                .wrapping_add(*chunk.get(index));
            chunk.emit(index, self.sum);
        }
        self.terms += chunk.len() as u64;
    }

    fn reverse_join(&mut self, left: &Self) {
        // `terms` must still be the right operand's count here.
        self.sum = exponentiate(self.multiplier, self.terms)
            .wrapping_mul(left.sum)
            .wrapping_add(self.sum);
        self.terms += left.terms;
    }

    fn assign(&mut self, other: &Self) {
        self.sum = other.sum;
        self.terms = other.terms;
    }
}

/// Computes `base^power` modulo 2^64 by square-and-multiply.
pub fn exponentiate(base: u64, power: u64) -> u64 {
    if power == 0 {
        return 1;
    }
    let top = 63 - power.leading_zeros();
    let mut acc = base;
    for position in (0..top).rev() {
        acc = acc.wrapping_mul(acc);
        if (power >> position) & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
    }
    acc
}

/// Serial reference of the Horner scan. Returns the final accumulated value.
pub fn horner_serial(data: &mut [u64], multiplier: u64) -> u64 {
    let mut running = 0u64;
    for value in data.iter_mut() {
        running = multiplier.wrapping_mul(running).wrapping_add(*value);
        *value = running;
    }
    running
}

/// Runs the Horner scan over `data` in place with the default configuration.
pub fn parallel_scan_horner(data: &mut [u64], multiplier: u64) {
    let range = default_range(data.len());
    let mut body = HornerScan::new(multiplier);
    tracing::debug!(len = data.len(), multiplier, grain = range.grain(), "horner scan");
    parallel_scan(range, data, &mut body);
}

/// Runs the Horner scan under `config` and returns the final accumulated
/// value, which equals the last element of the rewritten array (or 0 when the
/// array is empty).
pub fn parallel_scan_horner_with(
    data: &mut [u64],
    multiplier: u64,
    config: &KernelConfig,
) -> KernelResult<u64> {
    let range = config.range(data.len())?;
    tracing::debug!(
        len = data.len(),
        multiplier,
        grain = config.grain,
        worker_threads = config.worker_threads,
        "horner scan"
    );
    config.install(|| {
        let mut body = HornerScan::new(multiplier);
        parallel_scan(range, data, &mut body);
        body.sum()
    })
}
