// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Sorted, disjoint, non-touching half-open interval lists.
//!
//! [`IntervalSet`] tracks the unused part of one placement row ([`RowFreeSpace`]).
//!
//! Invariants (always held):
//!    - intervals are sorted by `start()`
//!    - no interval is empty
//!    - consecutive intervals neither overlap nor touch (`prev.end() < next.start()`)
//!
//! Complexity:
//!    - allocate, is_available, contains_point: `O(log n)` plus the vector shift
//!    - intersect/union/gaps_within: `O(n + m)`

use legalis_core::{Coord, GridVariable, primitives::Interval};
use std::fmt::{Debug, Display};

/// Free space of a single placement row.
pub type RowFreeSpace = IntervalSet<Coord>;

/// `allocate` was asked for a span that is not inside exactly one free interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationError<T> {
    span: Interval<T>,
}

impl<T: Copy> AllocationError<T> {
    #[inline]
    pub fn new(span: Interval<T>) -> Self {
        Self { span }
    }

    #[inline]
    pub fn span(&self) -> Interval<T> {
        self.span
    }
}

impl<T: Display> Display for AllocationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot allocate {}: span is not contained in a single free interval",
            self.span
        )
    }
}

impl<T: Debug + Display> std::error::Error for AllocationError<T> {}

/// A collection of sorted, disjoint, non-touching `[start, end)` intervals.
///
/// Unlike a plain interval union, touching intervals are always merged, so an allocation
/// request is either inside exactly one interval or not available at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntervalSet<T> {
    intervals: Vec<Interval<T>>,
}

impl<T> IntervalSet<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            intervals: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns a slice containing all intervals, left to right.
    #[inline]
    pub fn as_slice(&self) -> &[Interval<T>] {
        &self.intervals
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<T>> {
        self.intervals.iter()
    }

    #[inline]
    pub fn into_intervals(self) -> Vec<Interval<T>> {
        self.intervals
    }

    #[inline]
    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

impl<T: GridVariable> IntervalSet<T> {
    /// A set holding the single interval `span` (or nothing if it is empty).
    #[inline]
    pub fn full(span: Interval<T>) -> Self {
        let mut set = Self::new();
        if !span.is_empty() {
            set.intervals.push(span);
        }
        set
    }

    /// Builds a set from arbitrary intervals, sorting them and merging every overlapping or
    /// touching pair.
    pub fn from_vec(mut source: Vec<Interval<T>>) -> Self {
        source.retain(|iv| !iv.is_empty());
        source.sort_unstable_by_key(|iv| iv.start());
        let mut merged: Vec<Interval<T>> = Vec::with_capacity(source.len());
        for iv in source {
            match merged.last_mut() {
                Some(last) if last.end() >= iv.start() => {
                    *last = Interval::new(last.start(), last.end().max(iv.end()));
                }
                _ => merged.push(iv),
            }
        }
        debug_assert!(Self::are_invariants_held(&merged));
        Self { intervals: merged }
    }

    /// Index of the first interval with `end() > point`.
    #[inline]
    fn first_ending_after(&self, point: T) -> usize {
        self.intervals.partition_point(|iv| iv.end() <= point)
    }

    /// Index of the first interval with `start() >= point`.
    #[inline]
    fn first_starting_at_or_after(&self, point: T) -> usize {
        self.intervals.partition_point(|iv| iv.start() < point)
    }

    /// The interval containing `point`, if any.
    #[inline]
    pub fn interval_at(&self, point: T) -> Option<Interval<T>> {
        let i = self.first_ending_after(point);
        self.intervals
            .get(i)
            .copied()
            .filter(|iv| iv.start() <= point)
    }

    #[inline]
    pub fn contains_point(&self, point: T) -> bool {
        self.interval_at(point).is_some()
    }

    /// Whether any interval shares a positive-length part with `query`.
    #[inline]
    pub fn overlaps(&self, query: Interval<T>) -> bool {
        if query.is_empty() {
            return false;
        }
        let i = self.first_ending_after(query.start());
        i < self.intervals.len() && self.intervals[i].start() < query.end()
    }

    /// Whether `[x, x + width)` lies inside one free interval. Does not mutate.
    #[inline]
    pub fn is_available(&self, x: T, width: T) -> bool {
        if width <= T::zero() {
            return true;
        }
        let span = Interval::new(x, x + width);
        self.intervals
            .get(self.first_ending_after(x))
            .is_some_and(|iv| iv.contains_interval(&span))
    }

    /// Marks `[start, start + length)` as used.
    ///
    /// The span must lie inside exactly one free interval, which is then removed (exact
    /// match), shrunk from one side, or split in two.
    pub fn allocate(&mut self, start: T, length: T) -> Result<(), AllocationError<T>> {
        if length < T::zero() {
            return Err(AllocationError::new(Interval::new(start + length, start)));
        }
        let span = Interval::new(start, start + length);
        if span.is_empty() {
            return Ok(());
        }

        // Contains is decided before the scan may stop on a dominating interval.
        let i = self.first_ending_after(start);
        let Some(host) = self.intervals.get(i).copied() else {
            return Err(AllocationError::new(span));
        };
        if !host.contains_interval(&span) {
            return Err(AllocationError::new(span));
        }

        let left_rest = host.start() < span.start();
        let right_rest = span.end() < host.end();
        match (left_rest, right_rest) {
            (false, false) => {
                self.intervals.remove(i);
            }
            (true, false) => self.intervals[i] = Interval::new(host.start(), span.start()),
            (false, true) => self.intervals[i] = Interval::new(span.end(), host.end()),
            (true, true) => {
                self.intervals[i] = Interval::new(host.start(), span.start());
                self.intervals
                    .insert(i + 1, Interval::new(span.end(), host.end()));
            }
        }
        debug_assert!(Self::are_invariants_held(&self.intervals));
        Ok(())
    }

    /// Returns `span` to the free space, merging it with every interval it overlaps or
    /// touches.
    pub fn insert(&mut self, span: Interval<T>) {
        if span.is_empty() {
            return;
        }
        let mut at = self.first_starting_at_or_after(span.start());
        let mut lo = span.start();
        let mut hi = span.end();

        if at > 0 && self.intervals[at - 1].end() >= lo {
            at -= 1;
            lo = self.intervals[at].start();
            hi = hi.max(self.intervals[at].end());
        }
        let mut scan = at;
        while scan < self.intervals.len() && self.intervals[scan].start() <= hi {
            hi = hi.max(self.intervals[scan].end());
            scan += 1;
        }

        let merged = Interval::new(lo, hi);
        if scan == at {
            self.intervals.insert(at, merged);
        } else {
            self.intervals[at] = merged;
            self.intervals.drain(at + 1..scan);
        }
        debug_assert!(Self::are_invariants_held(&self.intervals));
    }

    /// OR of two sets.
    pub fn union(&self, other: &Self) -> Self {
        let mut out: Vec<Interval<T>> = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.len() || j < other.len() {
            let next = match (self.intervals.get(i), other.intervals.get(j)) {
                (Some(a), Some(b)) if a.start() <= b.start() => {
                    i += 1;
                    *a
                }
                (Some(_), Some(b)) => {
                    j += 1;
                    *b
                }
                (Some(a), None) => {
                    i += 1;
                    *a
                }
                (None, Some(b)) => {
                    j += 1;
                    *b
                }
                (None, None) => break,
            };
            match out.last_mut() {
                Some(last) if last.end() >= next.start() => {
                    *last = Interval::new(last.start(), last.end().max(next.end()));
                }
                _ => out.push(next),
            }
        }
        debug_assert!(Self::are_invariants_held(&out));
        Self { intervals: out }
    }

    /// AND of two sets: the space free in both.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0, 0);
        while i < self.len() && j < other.len() {
            let a = self.intervals[i];
            let b = other.intervals[j];
            if let Some(common) = a.intersection(&b) {
                out.push(common);
            }
            if a.end() <= b.end() {
                i += 1;
            } else {
                j += 1;
            }
        }
        debug_assert!(Self::are_invariants_held(&out));
        Self { intervals: out }
    }

    /// Replaces `self` with the AND of `self` and `other`.
    #[inline]
    pub fn intersect(&mut self, other: &Self) {
        *self = self.intersection(other);
    }

    /// Removes `span` from the set. Unlike [`IntervalSet::allocate`], `span` may cover any
    /// number of intervals, or none.
    pub fn subtract_interval(&mut self, span: Interval<T>) {
        if span.is_empty() {
            return;
        }
        let first = self.first_ending_after(span.start());
        let last = self.first_starting_at_or_after(span.end());
        if first >= last {
            return;
        }
        let mut replacement: Vec<Interval<T>> = Vec::with_capacity(2);
        let head = self.intervals[first];
        if head.start() < span.start() {
            replacement.push(Interval::new(head.start(), span.start()));
        }
        let tail = self.intervals[last - 1];
        if span.end() < tail.end() {
            replacement.push(Interval::new(span.end(), tail.end()));
        }
        self.intervals.splice(first..last, replacement);
        debug_assert!(Self::are_invariants_held(&self.intervals));
    }

    /// Drops every interval shorter than `width`.
    #[inline]
    pub fn remove_shorter_than(&mut self, width: T) {
        self.intervals.retain(|iv| iv.length() >= width);
    }

    /// Complement of the set inside `bounds`.
    pub fn gaps_within(&self, bounds: Interval<T>) -> Self {
        let mut out = Vec::with_capacity(self.len() + 1);
        let mut cursor = bounds.start();
        for iv in &self.intervals[self.first_ending_after(bounds.start())..] {
            if iv.start() >= bounds.end() {
                break;
            }
            if iv.start() > cursor {
                out.push(Interval::new(cursor, iv.start()));
            }
            cursor = cursor.max(iv.end());
        }
        if cursor < bounds.end() {
            out.push(Interval::new(cursor, bounds.end()));
        }
        Self { intervals: out }
    }

    /// The start `x` closest to `target` such that `[x, x + width)` is free.
    ///
    /// Ties go to the leftmost start.
    pub fn nearest_fit(&self, target: T, width: T) -> Option<T> {
        let mut best: Option<(T, T)> = None;
        for iv in &self.intervals {
            if iv.length() < width {
                continue;
            }
            let x = target.max(iv.start()).min(iv.end() - width);
            let d = (x - target).abs();
            match best {
                Some((_, bd)) if d >= bd => {
                    if iv.start() > target {
                        break;
                    }
                }
                _ => best = Some((x, d)),
            }
        }
        best.map(|(x, _)| x)
    }

    /// The smallest start `x >= lower` such that `[x, x + width)` is free.
    pub fn first_fit_at_or_after(&self, lower: T, width: T) -> Option<T> {
        self.intervals[self.first_ending_after(lower)..]
            .iter()
            .map(|iv| (lower.max(iv.start()), iv.end()))
            .find(|&(x, end)| x + width <= end)
            .map(|(x, _)| x)
    }

    /// The largest start `x` with `x + width <= upper` such that `[x, x + width)` is free.
    pub fn last_fit_ending_at_or_before(&self, upper: T, width: T) -> Option<T> {
        let upto = self.first_starting_at_or_after(upper);
        self.intervals[..upto]
            .iter()
            .rev()
            .map(|iv| (iv.start(), iv.end().min(upper) - width))
            .find(|&(start, x)| x >= start)
            .map(|(_, x)| x)
    }

    /// Total free length.
    #[inline]
    pub fn total_length(&self) -> T {
        self.intervals
            .iter()
            .fold(T::zero(), |acc, iv| acc + iv.length())
    }

    fn are_invariants_held(intervals: &[Interval<T>]) -> bool {
        intervals.iter().all(|iv| !iv.is_empty())
            && intervals.windows(2).all(|w| w[0].end() < w[1].start())
    }
}

impl<T: GridVariable> FromIterator<Interval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[inline]
    fn iv(a: i64, b: i64) -> Interval<i64> {
        Interval::new(a, b)
    }

    fn set(v: &[(i64, i64)]) -> RowFreeSpace {
        IntervalSet::from_vec(v.iter().map(|&(a, b)| iv(a, b)).collect())
    }

    fn random_set(rng: &mut ChaCha8Rng) -> RowFreeSpace {
        let n = rng.random_range(0..8);
        (0..n)
            .map(|_| {
                let s = rng.random_range(0..100);
                iv(s, s + rng.random_range(1..20))
            })
            .collect()
    }

    #[test]
    fn from_vec_merges_touching_and_drops_empty() {
        let s = set(&[(5, 7), (0, 2), (2, 3), (9, 9), (6, 8)]);
        assert_eq!(s.as_slice(), &[iv(0, 3), iv(5, 8)]);
    }

    #[test]
    fn allocate_exact_match_removes() {
        let mut s = set(&[(0, 10), (20, 30)]);
        s.allocate(20, 10).expect("exact fit");
        assert_eq!(s.as_slice(), &[iv(0, 10)]);
    }

    #[test]
    fn allocate_shrinks_from_either_side() {
        let mut s = set(&[(0, 10)]);
        s.allocate(0, 3).expect("left part");
        assert_eq!(s.as_slice(), &[iv(3, 10)]);
        s.allocate(7, 3).expect("right part");
        assert_eq!(s.as_slice(), &[iv(3, 7)]);
    }

    #[test]
    fn allocate_splits_interior() {
        let mut s = set(&[(0, 10)]);
        s.allocate(4, 2).expect("interior");
        assert_eq!(s.as_slice(), &[iv(0, 4), iv(6, 10)]);
    }

    #[test]
    fn allocate_outside_single_interval_is_an_error() {
        let mut s = set(&[(0, 10), (12, 20)]);
        let err = s.allocate(8, 6).unwrap_err();
        assert_eq!(err.span(), iv(8, 14));
        assert!(s.allocate(25, 1).is_err());
        assert_eq!(s, set(&[(0, 10), (12, 20)]), "failed allocation must not mutate");
    }

    #[test]
    fn allocate_then_insert_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let original = random_set(&mut rng);
            let Some(host) = original.as_slice().first().copied() else {
                continue;
            };
            let start = rng.random_range(host.start()..host.end());
            let len = rng.random_range(1..=host.end() - start);
            let mut s = original.clone();
            s.allocate(start, len).expect("span lies in host");
            assert!(!s.overlaps(iv(start, start + len)));
            s.insert(iv(start, start + len));
            assert_eq!(s, original, "round trip via {}", iv(start, start + len));
        }
    }

    #[test]
    fn intersection_is_commutative_and_associative() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_set(&mut rng);
            let b = random_set(&mut rng);
            let c = random_set(&mut rng);
            assert_eq!(a.intersection(&b), b.intersection(&a));
            assert_eq!(
                a.intersection(&b).intersection(&c),
                a.intersection(&b.intersection(&c))
            );
        }
    }

    #[test]
    fn intersect_in_place_matches_pairwise_and() {
        let mut a = set(&[(0, 10), (15, 30)]);
        a.intersect(&set(&[(5, 20), (25, 40)]));
        assert_eq!(a.as_slice(), &[iv(5, 10), iv(15, 20), iv(25, 30)]);
    }

    #[test]
    fn union_coalesces() {
        let u = set(&[(0, 5), (10, 12)]).union(&set(&[(5, 8), (20, 22)]));
        assert_eq!(u.as_slice(), &[iv(0, 8), iv(10, 12), iv(20, 22)]);
    }

    #[test]
    fn remove_shorter_than_keeps_wide_enough_intervals() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let s = random_set(&mut rng);
            let w = rng.random_range(1..10);
            let mut pruned = s.clone();
            pruned.remove_shorter_than(w);
            for x in 0..120 {
                assert_eq!(
                    s.is_available(x, w),
                    pruned.is_available(x, w),
                    "query [{}, {}) changed",
                    x,
                    x + w
                );
            }
        }
    }

    #[test]
    fn subtract_interval_cuts_across_intervals() {
        let mut s = set(&[(0, 10), (12, 20), (25, 30)]);
        s.subtract_interval(iv(5, 27));
        assert_eq!(s.as_slice(), &[iv(0, 5), iv(27, 30)]);
        s.subtract_interval(iv(40, 50));
        assert_eq!(s.as_slice(), &[iv(0, 5), iv(27, 30)]);
    }

    #[test]
    fn gaps_within_is_the_complement() {
        let s = set(&[(2, 4), (6, 8)]);
        assert_eq!(s.gaps_within(iv(0, 10)).as_slice(), &[iv(0, 2), iv(4, 6), iv(8, 10)]);
        assert_eq!(s.gaps_within(iv(3, 7)).as_slice(), &[iv(4, 6)]);
        assert!(set(&[(0, 10)]).gaps_within(iv(0, 10)).is_empty());
    }

    #[test]
    fn nearest_fit_prefers_closest_start() {
        let s = set(&[(0, 45), (65, 100)]);
        // Width 20 at target 50: left option 25, right option 65.
        assert_eq!(s.nearest_fit(50, 20), Some(65));
        assert_eq!(s.nearest_fit(40, 20), Some(25));
        assert_eq!(s.nearest_fit(70, 20), Some(70));
        assert_eq!(s.nearest_fit(50, 50), None);
    }

    #[test]
    fn directional_fits() {
        let s = set(&[(0, 5), (10, 30)]);
        assert_eq!(s.first_fit_at_or_after(3, 4), Some(10));
        assert_eq!(s.first_fit_at_or_after(0, 4), Some(0));
        assert_eq!(s.first_fit_at_or_after(27, 4), None);
        assert_eq!(s.last_fit_ending_at_or_before(12, 4), Some(1));
        assert_eq!(s.last_fit_ending_at_or_before(40, 4), Some(26));
        assert_eq!(s.last_fit_ending_at_or_before(3, 4), None);
    }

    #[test]
    fn is_available_needs_a_single_host() {
        let s = set(&[(0, 5), (6, 10)]);
        assert!(s.is_available(1, 4));
        assert!(!s.is_available(3, 4));
        assert!(s.contains_point(9));
        assert!(!s.contains_point(5));
        assert_eq!(s.total_length(), 9);
    }
}
