#![cfg(feature = "parallel")]

mod _fixtures;

use std::sync::{Mutex, MutexGuard};

use _fixtures::{carry_heavy_limbs, random_doubles, random_limbs, SEED};
use limbscan::bigint::popcount;
use limbscan::ieee754::sort_total;
use limbscan::scan::prefix_sum_inclusive;
use limbscan::utils::set_parallelism;
use limbscan::{parallel_bulk_add, parallel_scan_horner, IndexRange};

/// Held for the whole test so no other test flips the switch mid-comparison.
static TOGGLE_LOCK: Mutex<()> = Mutex::new(());

fn lock_toggle() -> MutexGuard<'static, ()> {
    TOGGLE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn assert_parallel_restored() {
    assert!(limbscan::utils::parallelism_enabled());
}

#[test]
fn horner_parallel_matches_sequential() {
    let _lock = lock_toggle();
    let input = random_limbs(50_000, SEED);
    let baseline = {
        let _guard = set_parallelism(false);
        let mut data = input.clone();
        parallel_scan_horner(&mut data, 3);
        data
    };
    assert_parallel_restored();
    let mut parallel = input;
    parallel_scan_horner(&mut parallel, 3);
    assert_eq!(baseline, parallel);
}

#[test]
fn bulk_add_parallel_matches_sequential() {
    let _lock = lock_toggle();
    let lhs = carry_heavy_limbs(40_000, SEED ^ 1);
    let rhs = carry_heavy_limbs(40_000, SEED ^ 2);
    let baseline = {
        let _guard = set_parallelism(false);
        let mut result = vec![0u64; lhs.len()];
        let carry = parallel_bulk_add(&mut result, &lhs, &rhs);
        (result, carry)
    };
    assert_parallel_restored();
    let mut result = vec![0u64; lhs.len()];
    let carry = parallel_bulk_add(&mut result, &lhs, &rhs);
    assert_eq!(baseline.0, result);
    assert_eq!(baseline.1, carry);
}

#[test]
fn prefix_sum_parallel_matches_sequential() {
    let _lock = lock_toggle();
    let input = random_limbs(30_000, SEED ^ 3);
    let range = IndexRange::with_len(input.len(), 128).expect("range");
    let baseline = {
        let _guard = set_parallelism(false);
        let mut data = input.clone();
        let total = prefix_sum_inclusive(range, &mut data);
        (data, total)
    };
    assert_parallel_restored();
    let mut data = input;
    let total = prefix_sum_inclusive(range, &mut data);
    assert_eq!(baseline, (data, total));
}

#[test]
fn popcount_parallel_matches_sequential() {
    let _lock = lock_toggle();
    let limbs = random_limbs(20_000, SEED ^ 4);
    let range = IndexRange::with_len(limbs.len(), 256).expect("range");
    let baseline = {
        let _guard = set_parallelism(false);
        popcount(range, &limbs)
    };
    assert_parallel_restored();
    assert_eq!(baseline, popcount(range, &limbs));
}

#[test]
fn sort_total_parallel_matches_sequential() {
    let _lock = lock_toggle();
    let input = random_doubles(20_000, SEED ^ 5);
    let baseline = {
        let _guard = set_parallelism(false);
        let mut values = input.clone();
        sort_total(&mut values);
        values.iter().map(|value| value.to_bits()).collect::<Vec<_>>()
    };
    assert_parallel_restored();
    let mut values = input;
    sort_total(&mut values);
    let parallel: Vec<u64> = values.iter().map(|value| value.to_bits()).collect();
    assert_eq!(baseline, parallel);
}
