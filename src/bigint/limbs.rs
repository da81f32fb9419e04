//! Serial limb primitives and a parallel population count.

use crate::partition::parallel_reduce;
use crate::partition::range::IndexRange;

/// Width of one limb in bits.
pub const LIMB_BITS: u32 = u64::BITS;

#[inline]
fn add_with_carry(lhs: u64, rhs: u64, carry: bool) -> (u64, bool) {
    let (partial, first) = lhs.overflowing_add(rhs);
    let (sum, second) = partial.overflowing_add(carry as u64);
    (sum, first | second)
}

/// Sets `out = lhs + rhs` limb by limb and returns the carry out of the top
/// limb.
pub fn add_n(out: &mut [u64], lhs: &[u64], rhs: &[u64]) -> bool {
    contract_assert!(
        out.len() == lhs.len() && lhs.len() == rhs.len(),
        "limb counts differ (out {}, lhs {}, rhs {})",
        out.len(),
        lhs.len(),
        rhs.len()
    );
    let mut carry = false;
    for ((slot, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
        let (sum, next) = add_with_carry(a, b, carry);
        *slot = sum;
        carry = next;
    }
    carry
}

/// Sets `acc = acc + rhs` and returns the carry out of the top limb.
pub fn add_n_assign(acc: &mut [u64], rhs: &[u64]) -> bool {
    contract_assert!(
        acc.len() == rhs.len(),
        "limb counts differ (acc {}, rhs {})",
        acc.len(),
        rhs.len()
    );
    let mut carry = false;
    for (slot, &b) in acc.iter_mut().zip(rhs) {
        let (sum, next) = add_with_carry(*slot, b, carry);
        *slot = sum;
        carry = next;
    }
    carry
}

/// Adds the single limb `value` to `limbs` in place, stopping as soon as the
/// carry dies. Returns the carry out of the top limb.
pub fn add_1(limbs: &mut [u64], value: u64) -> bool {
    let mut addend = value;
    for limb in limbs.iter_mut() {
        let (sum, overflow) = limb.overflowing_add(addend);
        *limb = sum;
        if !overflow {
            return false;
        }
        addend = 1;
    }
    addend != 0
}

/// Counts the set bits of `limbs` with a parallel reduction.
pub fn popcount(range: IndexRange, limbs: &[u64]) -> u64 {
    contract_assert!(
        limbs.len() == range.len(),
        "slice of {} limbs does not cover range of {} indices",
        limbs.len(),
        range.len()
    );
    let base = range.begin();
    parallel_reduce(
        range,
        0u64,
        |chunk, running| {
            limbs[chunk.begin() - base..chunk.end() - base]
                .iter()
                .fold(running, |acc, limb| acc + u64::from(limb.count_ones()))
        },
        |left, right| left + right,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_n_propagates_across_limbs() {
        let mut out = [0u64; 2];
        let carry = add_n(&mut out, &[u64::MAX, 0], &[1, 0]);
        assert_eq!(out, [0, 1]);
        assert!(!carry);
    }

    #[test]
    fn add_n_reports_top_carry() {
        let ones = [u64::MAX; 4];
        let mut out = [0u64; 4];
        assert!(add_n(&mut out, &ones, &ones));
        assert_eq!(out, [u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX]);
    }

    #[test]
    fn add_n_assign_matches_add_n() {
        let lhs = [3u64, u64::MAX, 7, u64::MAX];
        let rhs = [u64::MAX, 1, u64::MAX, 0];
        let mut expected = [0u64; 4];
        let expected_carry = add_n(&mut expected, &lhs, &rhs);
        let mut acc = lhs;
        assert_eq!(add_n_assign(&mut acc, &rhs), expected_carry);
        assert_eq!(acc, expected);
    }

    #[test]
    fn add_1_stops_when_carry_dies() {
        let mut limbs = [u64::MAX, u64::MAX, 5, u64::MAX];
        assert!(!add_1(&mut limbs, 1));
        assert_eq!(limbs, [0, 0, 6, u64::MAX]);
    }

    #[test]
    fn add_1_overflows_all_ones() {
        let mut limbs = [u64::MAX; 3];
        assert!(add_1(&mut limbs, 1));
        assert_eq!(limbs, [0; 3]);
        let mut empty: [u64; 0] = [];
        assert!(add_1(&mut empty, 1));
        assert!(!add_1(&mut empty, 0));
    }

    #[test]
    fn popcount_matches_serial_count() {
        let limbs: Vec<u64> = (0..10_000u64)
            .map(|i| i.wrapping_mul(0x9e37_79b9_7f4a_7c15))
            .collect();
        let expected: u64 = limbs.iter().map(|l| u64::from(l.count_ones())).sum();
        let range = IndexRange::with_len(limbs.len(), 256).expect("range");
        assert_eq!(popcount(range, &limbs), expected);
    }
}
