//! Parallel addition of equal-length limb arrays.
//!
//! Each chunk of limbs is added with a carry-in of zero. A chunk whose top limb
//! carries out records its end position in a lock-free queue; once every chunk
//! has finished, the recorded positions are drained in ascending order and
//! each one increments the result from that limb upwards. Increments commute,
//! so the drain order does not affect the result, and at most one of them can
//! run off the top of the array.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;

use crate::bigint::limbs::{add_1, add_n, add_n_assign};
use crate::config::{default_range, KernelConfig};
use crate::partition::parallel_for_mut;
use crate::partition::range::IndexRange;
use crate::KernelResult;

/// Outcome of a bulk addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkAddReport {
    /// Whether the sum overflowed `64 * n` bits.
    pub carry_out: bool,
    /// Number of chunks the parallel phase ran.
    pub chunks: usize,
    /// Number of chunk boundaries that needed a serial carry fix-up.
    pub unresolved_carries: usize,
}

impl BulkAddReport {
    /// The carry-out as a `0`/`1` limb.
    pub fn carry_bit(&self) -> u64 {
        u64::from(self.carry_out)
    }
}

/// Sets `result = lhs + rhs` over little-endian limbs and returns the carry-out
/// bit. All three slices must have the same length.
pub fn parallel_bulk_add(result: &mut [u64], lhs: &[u64], rhs: &[u64]) -> u64 {
    let range = default_range(result.len());
    bulk_add_in(range, result, lhs, rhs).carry_bit()
}

/// Sets `acc = acc + rhs` and returns the carry-out bit.
pub fn parallel_bulk_add_assign(acc: &mut [u64], rhs: &[u64]) -> u64 {
    let range = default_range(acc.len());
    bulk_add_assign_in(range, acc, rhs).carry_bit()
}

/// [`parallel_bulk_add`] under an explicit configuration.
pub fn parallel_bulk_add_with(
    result: &mut [u64],
    lhs: &[u64],
    rhs: &[u64],
    config: &KernelConfig,
) -> KernelResult<BulkAddReport> {
    let range = config.range(result.len())?;
    config.install(|| bulk_add_in(range, result, lhs, rhs))
}

/// [`parallel_bulk_add_assign`] under an explicit configuration.
pub fn parallel_bulk_add_assign_with(
    acc: &mut [u64],
    rhs: &[u64],
    config: &KernelConfig,
) -> KernelResult<BulkAddReport> {
    let range = config.range(acc.len())?;
    config.install(|| bulk_add_assign_in(range, acc, rhs))
}

fn bulk_add_in(range: IndexRange, result: &mut [u64], lhs: &[u64], rhs: &[u64]) -> BulkAddReport {
    contract_assert!(
        result.len() == lhs.len() && lhs.len() == rhs.len(),
        "limb counts differ (result {}, lhs {}, rhs {})",
        result.len(),
        lhs.len(),
        rhs.len()
    );
    run_chunks(range, result, |chunk, out| {
        let limbs = chunk.as_range();
        add_n(out, &lhs[limbs.clone()], &rhs[limbs])
    })
}

fn bulk_add_assign_in(range: IndexRange, acc: &mut [u64], rhs: &[u64]) -> BulkAddReport {
    contract_assert!(
        acc.len() == rhs.len(),
        "limb counts differ (acc {}, rhs {})",
        acc.len(),
        rhs.len()
    );
    run_chunks(range, acc, |chunk, out| add_n_assign(out, &rhs[chunk.as_range()]))
}

fn run_chunks<F>(range: IndexRange, result: &mut [u64], add_chunk: F) -> BulkAddReport
where
    F: Fn(IndexRange, &mut [u64]) -> bool + Sync,
{
    let unresolved = SegQueue::new();
    let chunks = AtomicUsize::new(0);
    parallel_for_mut(range, result, |chunk, out| {
        chunks.fetch_add(1, Ordering::Relaxed);
        if add_chunk(chunk, out) {
            unresolved.push(chunk.end());
        }
    });

    let mut positions: Vec<usize> = std::iter::from_fn(|| unresolved.pop()).collect();
    positions.sort_unstable();
    let carry_out = resolve_carries(result, &positions);
    let report = BulkAddReport {
        carry_out,
        chunks: chunks.into_inner(),
        unresolved_carries: positions.len(),
    };
    tracing::debug!(
        limbs = result.len(),
        chunks = report.chunks,
        unresolved = report.unresolved_carries,
        carry_out = report.carry_out,
        "bulk add"
    );
    report
}

/// Applies the deferred carries. `positions` are chunk end indices in `1..=n`.
fn resolve_carries(result: &mut [u64], positions: &[usize]) -> bool {
    let mut carry_out = false;
    for &position in positions {
        carry_out |= position == result.len() || add_1(&mut result[position..], 1);
    }
    carry_out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_crosses_single_limb_chunks() {
        let config = KernelConfig::new(1);
        let mut result = [0u64; 2];
        let report = parallel_bulk_add_with(&mut result, &[u64::MAX, 0], &[1, 0], &config)
            .expect("valid config");
        assert_eq!(result, [0, 1]);
        assert!(!report.carry_out);
        assert_eq!(report.chunks, 2);
        assert_eq!(report.unresolved_carries, 1);
    }

    #[test]
    fn all_ones_doubled_carries_out() {
        let ones = [u64::MAX; 4];
        let mut result = [0u64; 4];
        let carry = parallel_bulk_add(&mut result, &ones, &ones);
        assert_eq!(result, [u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX]);
        assert_eq!(carry, 1);
    }

    #[test]
    fn cascading_fixup_spans_chunks() {
        // Chunk [0, 1) carries into limbs that are all ones, so the fix-up runs
        // through every later chunk and off the top.
        let config = KernelConfig::new(1);
        let lhs = [u64::MAX, u64::MAX, u64::MAX, u64::MAX];
        let rhs = [1u64, 0, 0, 0];
        let mut result = [0u64; 4];
        let report =
            parallel_bulk_add_with(&mut result, &lhs, &rhs, &config).expect("valid config");
        assert_eq!(result, [0; 4]);
        assert!(report.carry_out);
        assert_eq!(report.unresolved_carries, 1);
    }

    #[test]
    fn fixups_landing_on_recorded_boundaries() {
        let config = KernelConfig::new(1);
        let lhs = [u64::MAX, u64::MAX, 0, 3];
        let rhs = [1u64, 0, 0, u64::MAX];
        let mut result = [0u64; 4];
        let report =
            parallel_bulk_add_with(&mut result, &lhs, &rhs, &config).expect("valid config");
        let mut expected = [0u64; 4];
        let expected_carry = add_n(&mut expected, &lhs, &rhs);
        assert_eq!(result, expected);
        assert_eq!(report.carry_out, expected_carry);
        assert_eq!(report.unresolved_carries, 2);
    }

    #[test]
    fn assign_variant_matches() {
        let lhs: Vec<u64> = (0..3_000u64).map(|i| u64::MAX - i % 3).collect();
        let rhs: Vec<u64> = (0..3_000u64).map(|i| i % 5).collect();
        let mut expected = vec![0u64; 3_000];
        let expected_carry = add_n(&mut expected, &lhs, &rhs);
        let mut acc = lhs.clone();
        let report = parallel_bulk_add_assign_with(&mut acc, &rhs, &KernelConfig::new(64))
            .expect("valid config");
        assert_eq!(acc, expected);
        assert_eq!(report.carry_out, expected_carry);
        assert_eq!(parallel_bulk_add_assign(&mut vec![1u64], &[2]), 0);
    }

    #[test]
    fn empty_arrays_have_no_carry() {
        let mut result: [u64; 0] = [];
        assert_eq!(parallel_bulk_add(&mut result, &[], &[]), 0);
    }
}
