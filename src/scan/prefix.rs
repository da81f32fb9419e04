//! Wrapping prefix sums over `u64` slices.
//!
//! Both kernels go through the closure form of the scan substrate; neither
//! needs a dedicated worker type because addition needs no extra state.

use crate::partition::range::IndexRange;
use crate::partition::scan::{parallel_scan_with, ScanChunk};

/// Rewrites `data` so that `data[i]` is the wrapping sum of `data[0..=i]`.
/// Returns the sum of the whole input.
pub fn prefix_sum_inclusive(range: IndexRange, data: &mut [u64]) -> u64 {
    parallel_scan_with(
        range,
        data,
        0u64,
        |mut chunk: ScanChunk<'_, u64>, mut running| {
            for index in 0..chunk.len() {
                running = running.wrapping_add(*chunk.get(index));
                chunk.emit(index, running);
            }
            running
        },
        |left, right| left.wrapping_add(*right),
    )
}

/// Rewrites `data` so that `data[i]` is the wrapping sum of `data[0..i]`.
/// Returns the sum of the whole input.
pub fn prefix_sum_exclusive(range: IndexRange, data: &mut [u64]) -> u64 {
    parallel_scan_with(
        range,
        data,
        0u64,
        |mut chunk: ScanChunk<'_, u64>, mut running| {
            for index in 0..chunk.len() {
                let value = *chunk.get(index);
                chunk.emit(index, running);
                running = running.wrapping_add(value);
            }
            running
        },
        |left, right| left.wrapping_add(*right),
    )
}
