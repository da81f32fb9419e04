//! Work-partitioning substrate.
//!
//! Every entry point recursively halves an [`IndexRange`] until the pieces are
//! no wider than the grain, runs the leaves through [`crate::utils::join`] and
//! composes results strictly left to right. Because the split tree depends
//! only on `(begin, end, grain)`, results are identical whether the leaves ran
//! on the rayon pool or serially under [`crate::utils::set_parallelism`].
//!
//! Fallible bodies stop the dispatch of chunks that have not started yet once
//! any chunk fails. Chunks already running are drained and the leftmost
//! recorded error is returned. Panics propagate through `rayon::join` after
//! both halves have completed.

use core::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utils::join;

pub mod range;
pub mod scan;

use range::IndexRange;

/// Invokes `body` on every chunk of `range`, possibly concurrently.
pub fn parallel_for<F>(range: IndexRange, body: F)
where
    F: Fn(IndexRange) + Sync,
{
    let outcome = try_parallel_for(range, |chunk| {
        body(chunk);
        Ok::<(), Infallible>(())
    });
    match outcome {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Invokes a fallible `body` on every chunk of `range`.
pub fn try_parallel_for<E, F>(range: IndexRange, body: F) -> Result<(), E>
where
    F: Fn(IndexRange) -> Result<(), E> + Sync,
    E: Send,
{
    if range.is_empty() {
        return Ok(());
    }
    let halted = AtomicBool::new(false);
    for_node(range, &body, &halted)
}

fn for_node<E, F>(range: IndexRange, body: &F, halted: &AtomicBool) -> Result<(), E>
where
    F: Fn(IndexRange) -> Result<(), E> + Sync,
    E: Send,
{
    if halted.load(Ordering::Relaxed) {
        return Ok(());
    }
    if range.is_divisible() {
        let (left, right) = range.split();
        let (left, right) = join(
            || for_node(left, body, halted),
            || for_node(right, body, halted),
        );
        return left.and(right);
    }
    let outcome = body(range);
    if outcome.is_err() {
        halted.store(true, Ordering::Relaxed);
    }
    outcome
}

/// Invokes `body` on every chunk of `range` together with the matching
/// disjoint subslice of `items`.
///
/// `items[k]` corresponds to index `range.begin() + k`.
pub fn parallel_for_mut<T, F>(range: IndexRange, items: &mut [T], body: F)
where
    T: Send,
    F: Fn(IndexRange, &mut [T]) + Sync,
{
    let outcome = try_parallel_for_mut(range, items, |chunk, slice| {
        body(chunk, slice);
        Ok::<(), Infallible>(())
    });
    match outcome {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Fallible variant of [`parallel_for_mut`].
pub fn try_parallel_for_mut<T, E, F>(range: IndexRange, items: &mut [T], body: F) -> Result<(), E>
where
    T: Send,
    F: Fn(IndexRange, &mut [T]) -> Result<(), E> + Sync,
    E: Send,
{
    contract_assert!(
        items.len() == range.len(),
        "slice of {} items does not cover range of {} indices",
        items.len(),
        range.len()
    );
    if range.is_empty() {
        return Ok(());
    }
    let halted = AtomicBool::new(false);
    for_mut_node(range, items, &body, &halted)
}

fn for_mut_node<T, E, F>(
    range: IndexRange,
    items: &mut [T],
    body: &F,
    halted: &AtomicBool,
) -> Result<(), E>
where
    T: Send,
    F: Fn(IndexRange, &mut [T]) -> Result<(), E> + Sync,
    E: Send,
{
    if halted.load(Ordering::Relaxed) {
        return Ok(());
    }
    if range.is_divisible() {
        let (left, right) = range.split();
        let (left_items, right_items) = items.split_at_mut(left.len());
        let (left, right) = join(
            || for_mut_node(left, left_items, body, halted),
            || for_mut_node(right, right_items, body, halted),
        );
        return left.and(right);
    }
    let outcome = body(range, items);
    if outcome.is_err() {
        halted.store(true, Ordering::Relaxed);
    }
    outcome
}

/// Folds every chunk from `identity` and combines the chunk states in index
/// order.
///
/// `combine` must be associative. It need not be commutative: the left
/// operand always covers lower indices than the right one.
pub fn parallel_reduce<T, F, C>(range: IndexRange, identity: T, fold: F, combine: C) -> T
where
    T: Clone + Send + Sync,
    F: Fn(IndexRange, T) -> T + Sync,
    C: Fn(T, T) -> T + Sync,
{
    let outcome = try_parallel_reduce(
        range,
        identity,
        |chunk, state| Ok::<T, Infallible>(fold(chunk, state)),
        combine,
    );
    match outcome {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Fallible variant of [`parallel_reduce`].
pub fn try_parallel_reduce<T, E, F, C>(
    range: IndexRange,
    identity: T,
    fold: F,
    combine: C,
) -> Result<T, E>
where
    T: Clone + Send + Sync,
    E: Send,
    F: Fn(IndexRange, T) -> Result<T, E> + Sync,
    C: Fn(T, T) -> T + Sync,
{
    if range.is_empty() {
        return Ok(identity);
    }
    let halted = AtomicBool::new(false);
    reduce_node(range, &identity, &fold, &combine, &halted)
}

fn reduce_node<T, E, F, C>(
    range: IndexRange,
    identity: &T,
    fold: &F,
    combine: &C,
    halted: &AtomicBool,
) -> Result<T, E>
where
    T: Clone + Send + Sync,
    E: Send,
    F: Fn(IndexRange, T) -> Result<T, E> + Sync,
    C: Fn(T, T) -> T + Sync,
{
    if halted.load(Ordering::Relaxed) {
        return Ok(identity.clone());
    }
    if range.is_divisible() {
        let (left, right) = range.split();
        let (left, right) = join(
            || reduce_node(left, identity, fold, combine, halted),
            || reduce_node(right, identity, fold, combine, halted),
        );
        return match (left, right) {
            (Err(err), _) | (_, Err(err)) => Err(err),
            (Ok(left), Ok(right)) => Ok(combine(left, right)),
        };
    }
    let outcome = fold(range, identity.clone());
    if outcome.is_err() {
        halted.store(true, Ordering::Relaxed);
    }
    outcome
}
