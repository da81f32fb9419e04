//! Two-pass parallel prefix scan.
//!
//! A scan is driven by a [`ScanBody`]: a worker holding a running state plus
//! read-only configuration. The substrate runs it in two passes over the same
//! deterministic split tree:
//!
//! 1. **Prescan.** Every leaf chunk gets a fresh worker from
//!    [`ScanBody::split`] and folds its chunk without writing output. Sibling
//!    summaries are composed bottom-up with [`ScanBody::reverse_join`], so each
//!    internal node knows the state of its whole subrange.
//! 2. **Final scan.** The tree is walked top-down carrying the state of
//!    everything left of the current node. Each leaf receives that state via
//!    [`ScanBody::assign`] and replays its chunk with output enabled.
//!
//! Each chunk is visited exactly once per pass. A chunk's final pass starts only
//! after its left-boundary state has been computed from the prescan summaries.

use crate::partition::range::IndexRange;
use crate::utils::join;

/// Which of the two passes a chunk is being applied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScanPass {
    /// Compute the chunk's state without writing output.
    Prescan,
    /// Compute the state from the finalised left boundary and write output.
    Final,
}

/// One chunk handed to [`ScanBody::apply`].
///
/// Indexing through [`ScanChunk::get`] and [`ScanChunk::emit`] is local to the
/// chunk; [`ScanChunk::begin`] gives the absolute position of local index 0.
#[derive(Debug)]
pub enum ScanChunk<'a, T> {
    Prescan { begin: usize, items: &'a [T] },
    Final { begin: usize, items: &'a mut [T] },
}

impl<'a, T> ScanChunk<'a, T> {
    pub fn begin(&self) -> usize {
        match self {
            ScanChunk::Prescan { begin, .. } | ScanChunk::Final { begin, .. } => *begin,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn pass(&self) -> ScanPass {
        match self {
            ScanChunk::Prescan { .. } => ScanPass::Prescan,
            ScanChunk::Final { .. } => ScanPass::Final,
        }
    }

    pub fn is_final(&self) -> bool {
        self.pass() == ScanPass::Final
    }

    /// Input elements of the chunk.
    pub fn items(&self) -> &[T] {
        match self {
            ScanChunk::Prescan { items, .. } => &items[..],
            ScanChunk::Final { items, .. } => &items[..],
        }
    }

    pub fn get(&self, index: usize) -> &T {
        &self.items()[index]
    }

    /// Writes `value` at local `index` during the final pass; ignored during
    /// the prescan.
    pub fn emit(&mut self, index: usize, value: T) {
        if let ScanChunk::Final { items, .. } = self {
            items[index] = value;
        }
    }
}

/// Worker protocol for [`parallel_scan`].
///
/// The combined state must be associative under `reverse_join`; it does not
/// need to be commutative.
pub trait ScanBody<T>: Sized + Send + Sync {
    /// Creates a worker sharing this worker's configuration, with the identity
    /// state.
    fn split(&self) -> Self;

    /// Folds `chunk` into the running state in ascending index order. Output may
    /// only be written when the chunk is [`ScanPass::Final`].
    fn apply(&mut self, chunk: ScanChunk<'_, T>);

    /// Folds the state of the neighbouring subrange immediately to the left
    /// into `self`, which then describes both subranges.
    fn reverse_join(&mut self, left: &Self);

    /// Replaces the state of `self` with the state of `other`.
    fn assign(&mut self, other: &Self);
}

fn duplicate<T, B: ScanBody<T>>(body: &B) -> B {
    let mut copy = body.split();
    copy.assign(body);
    copy
}

struct Summary<B> {
    state: B,
    children: Option<Box<(Summary<B>, Summary<B>)>>,
}

/// Runs an inclusive scan of `items` with `body`.
///
/// The state held by `body` on entry is treated as the state of everything
/// before `items[0]` (normally the identity). On return `body` holds the state
/// of the whole input.
pub fn parallel_scan<T, B>(range: IndexRange, items: &mut [T], body: &mut B)
where
    T: Send + Sync,
    B: ScanBody<T>,
{
    contract_assert!(
        items.len() == range.len(),
        "slice of {} items does not cover range of {} indices",
        items.len(),
        range.len()
    );
    if range.is_empty() {
        return;
    }
    if !range.is_divisible() {
        body.apply(ScanChunk::Final {
            begin: range.begin(),
            items,
        });
        return;
    }

    let summary = {
        let prototype: &B = body;
        upsweep(prototype, range, items)
    };
    downsweep(range, items, &summary, body);
    let mut total = duplicate::<T, B>(&summary.state);
    total.reverse_join(body);
    body.assign(&total);
}

fn upsweep<T, B>(prototype: &B, range: IndexRange, items: &[T]) -> Summary<B>
where
    T: Send + Sync,
    B: ScanBody<T>,
{
    if !range.is_divisible() {
        let mut state = prototype.split();
        state.apply(ScanChunk::Prescan {
            begin: range.begin(),
            items,
        });
        return Summary {
            state,
            children: None,
        };
    }
    let (left_range, right_range) = range.split();
    let (left_items, right_items) = items.split_at(left_range.len());
    let (left, right) = join(
        || upsweep(prototype, left_range, left_items),
        || upsweep(prototype, right_range, right_items),
    );
    let mut state = duplicate::<T, B>(&right.state);
    state.reverse_join(&left.state);
    Summary {
        state,
        children: Some(Box::new((left, right))),
    }
}

fn downsweep<T, B>(
    range: IndexRange,
    items: &mut [T],
    summary: &Summary<B>,
    incoming: &B,
) where
    T: Send + Sync,
    B: ScanBody<T>,
{
    match &summary.children {
        None => {
            let mut worker = duplicate::<T, B>(incoming);
            worker.apply(ScanChunk::Final {
                begin: range.begin(),
                items,
            });
        }
        Some(children) => {
            let (left, right) = &**children;
            let (left_range, right_range) = range.split();
            let (left_items, right_items) = items.split_at_mut(left_range.len());
            let mut right_incoming = duplicate::<T, B>(&left.state);
            right_incoming.reverse_join(incoming);
            join(
                || downsweep(left_range, left_items, left, incoming),
                || downsweep(right_range, right_items, right, &right_incoming),
            );
        }
    }
}

/// Adapter running closures through the [`ScanBody`] protocol.
struct FnScan<'f, S, F, C> {
    identity: &'f S,
    state: S,
    scan: &'f F,
    combine: &'f C,
}

impl<'f, T, S, F, C> ScanBody<T> for FnScan<'f, S, F, C>
where
    S: Clone + Send + Sync,
    F: Fn(ScanChunk<'_, T>, S) -> S + Sync,
    C: Fn(&S, &S) -> S + Sync,
{
    fn split(&self) -> Self {
        Self {
            identity: self.identity,
            state: self.identity.clone(),
            scan: self.scan,
            combine: self.combine,
        }
    }

    fn apply(&mut self, chunk: ScanChunk<'_, T>) {
        let state = core::mem::replace(&mut self.state, self.identity.clone());
        self.state = (self.scan)(chunk, state);
    }

    fn reverse_join(&mut self, left: &Self) {
        self.state = (self.combine)(&left.state, &self.state);
    }

    fn assign(&mut self, other: &Self) {
        self.state = other.state.clone();
    }
}

/// Closure form of [`parallel_scan`].
///
/// `scan` folds a chunk into the incoming state and returns the outgoing one,
/// writing output only for final chunks. `combine(left, right)` composes the
/// states of adjacent subranges. Returns the state of the whole input.
pub fn parallel_scan_with<T, S, F, C>(
    range: IndexRange,
    items: &mut [T],
    identity: S,
    scan: F,
    combine: C,
) -> S
where
    T: Send + Sync,
    S: Clone + Send + Sync,
    F: Fn(ScanChunk<'_, T>, S) -> S + Sync,
    C: Fn(&S, &S) -> S + Sync,
{
    let mut body = FnScan {
        identity: &identity,
        state: identity.clone(),
        scan: &scan,
        combine: &combine,
    };
    parallel_scan(range, items, &mut body);
    body.state
}
