//! Half-open index ranges with a subdivision grain.

use core::num::NonZeroUsize;
use core::ops::Range;

use crate::{KernelError, KernelResult};

/// The interval `[begin, end)` together with the minimum chunk width `grain`.
///
/// A range is divisible while it holds more than `grain` elements. Splitting
/// always cuts at the midpoint, so the chunk cover of a range is a pure
/// function of `(begin, end, grain)` and every leaf holds between
/// `ceil(grain / 2)` and `grain` elements (a range no wider than `grain` is
/// its own single leaf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    begin: usize,
    end: usize,
    grain: usize,
}

impl IndexRange {
    /// Creates a range, rejecting `grain == 0` and `end < begin`.
    pub fn new(begin: usize, end: usize, grain: usize) -> KernelResult<Self> {
        if grain == 0 {
            return Err(KernelError::InvalidGrain);
        }
        if end < begin {
            return Err(KernelError::InvertedRange { begin, end });
        }
        Ok(Self { begin, end, grain })
    }

    /// The range `[0, len)` with a grain that is nonzero by construction.
    pub const fn prefix(len: usize, grain: NonZeroUsize) -> Self {
        Self {
            begin: 0,
            end: len,
            grain: grain.get(),
        }
    }

    /// Shorthand for `[0, len)`.
    pub fn with_len(len: usize, grain: usize) -> KernelResult<Self> {
        Self::new(0, len, grain)
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn grain(&self) -> usize {
        self.grain
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Whether the substrate will subdivide this range further.
    pub fn is_divisible(&self) -> bool {
        self.len() > self.grain
    }

    /// Splits at the midpoint. Both halves are non-empty for a divisible range.
    pub fn split(&self) -> (Self, Self) {
        let middle = self.begin + self.len() / 2;
        (
            Self {
                begin: self.begin,
                end: middle,
                grain: self.grain,
            },
            Self {
                begin: middle,
                end: self.end,
                grain: self.grain,
            },
        )
    }

    pub fn as_range(&self) -> Range<usize> {
        self.begin..self.end
    }

    /// Returns the leaf chunks the substrate dispatches, in ascending order.
    pub fn chunks(&self) -> Vec<IndexRange> {
        let mut out = Vec::new();
        if !self.is_empty() {
            self.collect_leaves(&mut out);
        }
        out
    }

    fn collect_leaves(&self, out: &mut Vec<IndexRange>) {
        if self.is_divisible() {
            let (left, right) = self.split();
            left.collect_leaves(out);
            right.collect_leaves(out);
        } else {
            out.push(*self);
        }
    }

    /// Depth of the split tree above the leaves.
    pub fn depth(&self) -> u32 {
        if self.is_divisible() {
            let (left, right) = self.split();
            1 + left.depth().max(right.depth())
        } else {
            0
        }
    }
}

impl From<IndexRange> for Range<usize> {
    fn from(range: IndexRange) -> Self {
        range.as_range()
    }
}
