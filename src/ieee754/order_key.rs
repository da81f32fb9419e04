//! Total-order keys for `f64`.
//!
//! [`double_key`] maps a double to an `i64` whose natural order refines the
//! floating-point order: `x < y` implies `key(x) < key(y)` for all non-NaN
//! `x`, `y`. Equal doubles share a key, with one refinement: `-0.0` and `+0.0`
//! compare equal as doubles but get distinct keys with `key(-0.0) < key(+0.0)`.
//! The infinities map to the extremes of the non-NaN keys. NaNs get keys too
//! (positive-sign NaNs above `+inf`, negative-sign NaNs below `-inf`, ordered
//! by payload), so the transform is a total order on all bit patterns and
//! agrees with [`f64::total_cmp`].
//!
//! Non-negative encodings are kept as they are. Negative encodings have every
//! bit except the sign flipped, since a larger magnitude means a smaller value.

use super::convert::SIGN_BIT;

/// Maps `value` to a signed key ordered like the value.
#[inline]
pub fn double_key(value: f64) -> i64 {
    let bits = value.to_bits();
    let mask = (((bits as i64) >> 63) as u64) >> 1;
    (bits ^ mask) as i64
}

/// Unsigned form of [`double_key`], for radix sorting.
///
/// Flipping the sign bit of the signed key moves negative keys below positive
/// ones under unsigned comparison.
#[inline]
pub fn double_key_unsigned(value: f64) -> u64 {
    (double_key(value) as u64) ^ SIGN_BIT
}

/// Inverse of [`double_key`]; recovers the exact encoding including NaN
/// payloads.
#[inline]
pub fn key_to_double(key: i64) -> f64 {
    let mask = ((key >> 63) as u64) >> 1;
    f64::from_bits((key as u64) ^ mask)
}

/// Inverse of [`double_key_unsigned`].
#[inline]
pub fn unsigned_key_to_double(key: u64) -> f64 {
    key_to_double((key ^ SIGN_BIT) as i64)
}

/// Sorts `values` ascending by [`double_key`].
pub fn sort_total(values: &mut [f64]) {
    #[cfg(feature = "parallel")]
    if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        values.par_sort_unstable_by_key(|value| double_key(*value));
        return;
    }
    values.sort_unstable_by_key(|value| double_key(*value));
}
