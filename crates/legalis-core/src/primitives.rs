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

//! # Interval Primitives
//!
//! The half-open [`Interval`] and the pairwise operations the free-space tracker is built
//! from: overlap, touch, dominance, containment, pairwise intersection and pairwise union.
//!
//! Degenerate (zero-length) intervals are valid values but never appear in algebra
//! results: [`Interval::intersection`] returns `None` instead of an empty interval.

use std::fmt;
use std::ops::{Add, Range, Sub};

/// A half-open interval `[start, end)` on one axis.
///
/// # Examples
///
/// ```
/// use legalis_core::primitives::Interval;
/// let interval = Interval::new(1, 5);
/// assert_eq!(interval.start(), 1);
/// assert_eq!(interval.end(), 5);
/// assert!(interval.contains(3));
/// assert!(!interval.contains(5));
/// assert_eq!(interval.length(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start_inclusive: T,
    end_exclusive: T,
}

/// Returned by [`Interval::try_new`] when the bounds are inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvertedIntervalError<T> {
    start: T,
    end: T,
}

impl<T: Copy> InvertedIntervalError<T> {
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }
}

impl<T: fmt::Display> fmt::Display for InvertedIntervalError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interval start {} lies after its end {}",
            self.start, self.end
        )
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for InvertedIntervalError<T> {}

/// The result of [`Interval::union`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntervalUnion<T> {
    /// The operands overlap or touch and form one interval.
    Joined(Interval<T>),
    /// The operands are separated by a gap; ordered left to right.
    Disjoint(Interval<T>, Interval<T>),
}

impl<T> Interval<T> {
    /// Creates the interval `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or the bounds are not comparable. Inverted bounds are a
    /// caller contract breach; use [`Interval::try_new`] for unchecked input.
    ///
    /// # Examples
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let interval = Interval::new(3, 5);
    /// assert_eq!(interval.start(), 3);
    /// assert!(Interval::new(4, 4).is_empty());
    /// ```
    #[inline]
    pub fn new(start: T, end: T) -> Self
    where
        T: PartialOrd + Copy + fmt::Debug,
    {
        assert!(
            start <= end,
            "Interval::new: start {:?} lies after end {:?}",
            start,
            end
        );
        Self {
            start_inclusive: start,
            end_exclusive: end,
        }
    }

    /// Creates `[start, end)` or reports inverted bounds.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// assert!(Interval::try_new(1, 2).is_ok());
    /// assert!(Interval::try_new(2, 1).is_err());
    /// ```
    #[inline]
    pub fn try_new(start: T, end: T) -> Result<Self, InvertedIntervalError<T>>
    where
        T: PartialOrd + Copy,
    {
        if start <= end {
            Ok(Self {
                start_inclusive: start,
                end_exclusive: end,
            })
        } else {
            Err(InvertedIntervalError::new(start, end))
        }
    }

    /// Creates `[start, start + length)`.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// assert_eq!(Interval::with_length(10, 5), Interval::new(10, 15));
    /// ```
    #[inline]
    pub fn with_length(start: T, length: T) -> Self
    where
        T: PartialOrd + Copy + fmt::Debug + Add<Output = T>,
    {
        Self::new(start, start + length)
    }

    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start_inclusive
    }

    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end_exclusive
    }

    /// `end - start`.
    #[inline]
    pub fn length(&self) -> T
    where
        T: Copy + Sub<Output = T>,
    {
        self.end_exclusive - self.start_inclusive
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    where
        T: PartialEq,
    {
        self.start_inclusive == self.end_exclusive
    }

    /// Checks `start <= x < end`.
    #[inline]
    pub fn contains(&self, x: T) -> bool
    where
        T: PartialOrd,
    {
        x >= self.start_inclusive && x < self.end_exclusive
    }

    /// Checks whether `other` lies entirely inside `self`.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.contains_interval(&Interval::new(2, 4)));
    /// assert!(a.contains_interval(&a));
    /// assert!(!a.contains_interval(&Interval::new(0, 6)));
    /// ```
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start_inclusive >= self.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// Checks whether the two intervals share a part of positive length.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.overlaps(&Interval::new(4, 6)));
    /// assert!(!a.overlaps(&Interval::new(5, 7)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        self.start_inclusive < self.end_exclusive
            && other.start_inclusive < other.end_exclusive
            && self.start_inclusive < other.end_exclusive
            && other.start_inclusive < self.end_exclusive
    }

    /// Checks whether the two intervals meet at exactly one endpoint without overlapping.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.touches(&Interval::new(5, 7)));
    /// assert!(Interval::new(5, 7).touches(&a));
    /// assert!(!a.touches(&Interval::new(6, 7)));
    /// ```
    #[inline]
    pub fn touches(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        self.end_exclusive == other.start_inclusive || other.end_exclusive == self.start_inclusive
    }

    /// Checks whether `self` lies entirely right of `other` with a gap between them.
    ///
    /// In a sorted list, once an interval dominates a query every later interval does too,
    /// which lets scans stop early.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(6, 9);
    /// assert!(a.dominates(&Interval::new(1, 5)));
    /// assert!(!a.dominates(&Interval::new(1, 6))); // touching
    /// ```
    #[inline]
    pub fn dominates(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        self.start_inclusive > other.end_exclusive
    }

    /// Pairwise AND. Returns `None` when the common part is empty.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert_eq!(a.intersection(&Interval::new(3, 8)), Some(Interval::new(3, 5)));
    /// assert_eq!(a.intersection(&Interval::new(5, 8)), None);
    /// ```
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self>
    where
        T: Ord + Copy,
    {
        let start = self.start_inclusive.max(other.start_inclusive);
        let end = self.end_exclusive.min(other.end_exclusive);
        (start < end).then_some(Self {
            start_inclusive: start,
            end_exclusive: end,
        })
    }

    /// Pairwise OR. Overlapping or touching operands are joined; otherwise both are
    /// returned in ascending order.
    ///
    /// ```
    /// use legalis_core::primitives::{Interval, IntervalUnion};
    ///
    /// let a = Interval::new(1, 5);
    /// assert_eq!(a.union(&Interval::new(5, 8)), IntervalUnion::Joined(Interval::new(1, 8)));
    /// assert_eq!(
    ///     Interval::new(7, 9).union(&a),
    ///     IntervalUnion::Disjoint(a, Interval::new(7, 9))
    /// );
    /// ```
    #[inline]
    pub fn union(&self, other: &Self) -> IntervalUnion<T>
    where
        T: Ord + Copy,
    {
        let (left, right) = if self.start_inclusive <= other.start_inclusive {
            (*self, *other)
        } else {
            (*other, *self)
        };
        if left.end_exclusive >= right.start_inclusive {
            IntervalUnion::Joined(Self {
                start_inclusive: left.start_inclusive,
                end_exclusive: left.end_exclusive.max(right.end_exclusive),
            })
        } else {
            IntervalUnion::Disjoint(left, right)
        }
    }

    /// Shifts both bounds by `delta`.
    #[inline]
    pub fn translate(&self, delta: T) -> Self
    where
        T: Copy + Add<Output = T>,
    {
        Self {
            start_inclusive: self.start_inclusive + delta,
            end_exclusive: self.end_exclusive + delta,
        }
    }

    /// Clamps a point into `[start, end]`.
    ///
    /// ```
    /// use legalis_core::primitives::Interval;
    ///
    /// let a = Interval::new(0, 10);
    /// assert_eq!(a.clamp_point(-3), 0);
    /// assert_eq!(a.clamp_point(12), 10);
    /// ```
    #[inline]
    pub fn clamp_point(&self, x: T) -> T
    where
        T: Ord + Copy,
    {
        x.clamp(self.start_inclusive, self.end_exclusive)
    }

    #[inline]
    pub fn to_range(&self) -> Range<T>
    where
        T: Copy,
    {
        self.start_inclusive..self.end_exclusive
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T: PartialOrd + Copy + fmt::Debug> From<Range<T>> for Interval<T> {
    #[inline]
    fn from(range: Range<T>) -> Self {
        Interval::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(a: i64, b: i64) -> Interval<i64> {
        Interval::new(a, b)
    }

    #[test]
    #[should_panic(expected = "lies after end")]
    fn new_rejects_inverted_bounds() {
        let _ = iv(5, 3);
    }

    #[test]
    fn try_new_reports_inverted_bounds() {
        let err = Interval::try_new(5, 3).unwrap_err();
        assert_eq!(err.start(), 5);
        assert_eq!(err.end(), 3);
        assert_eq!(err.to_string(), "Interval start 5 lies after its end 3");
    }

    #[test]
    fn overlap_touch_and_dominance_are_exclusive_relations() {
        let a = iv(0, 10);
        let touching = iv(10, 20);
        let gap = iv(11, 20);
        let inner = iv(2, 3);

        assert!(!a.overlaps(&touching) && a.touches(&touching) && !touching.dominates(&a));
        assert!(!a.overlaps(&gap) && !a.touches(&gap) && gap.dominates(&a));
        assert!(a.overlaps(&inner) && !a.touches(&inner) && !inner.dominates(&a));
    }

    #[test]
    fn degenerate_intervals_never_overlap() {
        let point = iv(5, 5);
        assert!(!point.overlaps(&iv(0, 10)));
        assert!(!iv(0, 10).overlaps(&point));
        assert!(!point.overlaps(&point));
        assert!(iv(0, 10).contains_interval(&point));
        assert_eq!(point.intersection(&iv(0, 10)), None);
    }

    #[test]
    fn intersection_is_commutative() {
        let pairs = [(iv(0, 5), iv(3, 9)), (iv(0, 5), iv(5, 9)), (iv(2, 4), iv(0, 9))];
        for (a, b) in pairs {
            assert_eq!(a.intersection(&b), b.intersection(&a), "{a} AND {b}");
        }
    }

    #[test]
    fn union_covers_both_operands() {
        match iv(0, 3).union(&iv(2, 6)) {
            IntervalUnion::Joined(j) => assert_eq!(j, iv(0, 6)),
            other => panic!("expected joined, got {:?}", other),
        }
        match iv(8, 9).union(&iv(0, 3)) {
            IntervalUnion::Disjoint(l, r) => {
                assert_eq!(l, iv(0, 3));
                assert_eq!(r, iv(8, 9));
            }
            other => panic!("expected disjoint, got {:?}", other),
        }
    }

    #[test]
    fn translate_and_range_roundtrip() {
        let a = iv(1, 4).translate(10);
        assert_eq!(a, iv(11, 14));
        assert_eq!(Interval::from(a.to_range()), a);
        assert_eq!(format!("{a}"), "[11, 14)");
    }
}
