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

//! The placement region and its row discretization.
//!
//! Rows are numbered `0..row_count()` from the bottom; row `r` spans
//! `[bottom + r * row_height, bottom + (r + 1) * row_height)`. A partial row left over at the
//! top of the region is not usable.

use crate::err::{
    DegenerateRegionError, InvalidMinBlockWidthError, InvalidRowHeightError, RegionError,
};
use legalis_core::Coord;
use legalis_core::geometry::Rect;
use legalis_core::primitives::Interval;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementRegion {
    left: Coord,
    right: Coord,
    bottom: Coord,
    top: Coord,
    row_height: Coord,
    min_block_width: Coord,
}

impl PlacementRegion {
    pub fn new(
        left: Coord,
        right: Coord,
        bottom: Coord,
        top: Coord,
        row_height: Coord,
        min_block_width: Coord,
    ) -> Result<Self, RegionError> {
        if left >= right || bottom >= top {
            return Err(DegenerateRegionError::new(left, right, bottom, top).into());
        }
        if row_height <= 0 || row_height > top - bottom {
            return Err(InvalidRowHeightError::new(row_height, top - bottom).into());
        }
        if min_block_width <= 0 {
            return Err(InvalidMinBlockWidthError::new(min_block_width).into());
        }
        Ok(Self {
            left,
            right,
            bottom,
            top,
            row_height,
            min_block_width,
        })
    }

    #[inline]
    pub fn left(&self) -> Coord {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Coord {
        self.right
    }

    #[inline]
    pub fn bottom(&self) -> Coord {
        self.bottom
    }

    #[inline]
    pub fn top(&self) -> Coord {
        self.top
    }

    #[inline]
    pub fn row_height(&self) -> Coord {
        self.row_height
    }

    #[inline]
    pub fn min_block_width(&self) -> Coord {
        self.min_block_width
    }

    #[inline]
    pub fn width(&self) -> Coord {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.top - self.bottom
    }

    #[inline]
    pub fn x_span(&self) -> Interval<Coord> {
        Interval::new(self.left, self.right)
    }

    #[inline]
    pub fn y_span(&self) -> Interval<Coord> {
        Interval::new(self.bottom, self.top)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.bottom, self.width(), self.height())
    }

    /// Number of complete rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        (self.height() / self.row_height) as usize
    }

    #[inline]
    pub fn row_bottom(&self, row: usize) -> Coord {
        self.bottom + row as Coord * self.row_height
    }

    #[inline]
    pub fn row_span(&self, row: usize) -> Interval<Coord> {
        let lo = self.row_bottom(row);
        Interval::new(lo, lo + self.row_height)
    }

    /// Number of rows a block of `height` occupies, `ceil(height / row_height)`.
    #[inline]
    pub fn rows_spanned(&self, height: Coord) -> usize {
        ((height.max(1) + self.row_height - 1) / self.row_height) as usize
    }

    /// The highest row a block of `height` can start in, or `None` if it is taller than the
    /// region.
    #[inline]
    pub fn max_start_row(&self, height: Coord) -> Option<usize> {
        self.row_count().checked_sub(self.rows_spanned(height))
    }

    /// The row whose lower edge is nearest to `y`, clamped into the grid.
    #[inline]
    pub fn nearest_row(&self, y: f64) -> usize {
        let rows = self.row_count() as f64;
        let r = ((y - self.bottom as f64) / self.row_height as f64).round();
        r.clamp(0.0, rows - 1.0) as usize
    }

    /// The row containing grid coordinate `y`, clamped into the grid.
    #[inline]
    pub fn row_containing(&self, y: Coord) -> usize {
        let r = (y - self.bottom).div_euclid(self.row_height);
        r.clamp(0, self.row_count() as Coord - 1) as usize
    }

    /// Rows whose span shares a positive-length part with `y_span`, clipped to the grid.
    pub fn rows_covering(&self, y_span: Interval<Coord>) -> Option<Range<usize>> {
        let clipped = y_span.intersection(&Interval::new(
            self.bottom,
            self.row_bottom(self.row_count()),
        ))?;
        let first = (clipped.start() - self.bottom).div_euclid(self.row_height);
        let last = (clipped.end() - self.bottom + self.row_height - 1).div_euclid(self.row_height);
        Some(first as usize..last as usize)
    }

    /// Whether `y` sits exactly on a row boundary inside the region.
    #[inline]
    pub fn is_row_aligned(&self, y: Coord) -> bool {
        (y - self.bottom).rem_euclid(self.row_height) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> PlacementRegion {
        PlacementRegion::new(0, 100, 10, 65, 10, 2).expect("valid region")
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(matches!(
            PlacementRegion::new(5, 5, 0, 10, 1, 1),
            Err(RegionError::Degenerate(_))
        ));
        assert!(matches!(
            PlacementRegion::new(0, 5, 0, 10, 11, 1),
            Err(RegionError::RowHeight(_))
        ));
        assert!(matches!(
            PlacementRegion::new(0, 5, 0, 10, 5, 0),
            Err(RegionError::MinBlockWidth(_))
        ));
    }

    #[test]
    fn partial_top_row_is_dropped() {
        let r = region();
        assert_eq!(r.row_count(), 5);
        assert_eq!(r.row_span(4), Interval::new(50, 60));
    }

    #[test]
    fn row_span_counts_round_up() {
        let r = region();
        assert_eq!(r.rows_spanned(10), 1);
        assert_eq!(r.rows_spanned(11), 2);
        assert_eq!(r.max_start_row(20), Some(3));
        assert_eq!(r.max_start_row(60), None);
    }

    #[test]
    fn nearest_row_clamps() {
        let r = region();
        assert_eq!(r.nearest_row(-100.0), 0);
        assert_eq!(r.nearest_row(24.0), 1);
        assert_eq!(r.nearest_row(26.0), 2);
        assert_eq!(r.nearest_row(1e6), 4);
    }

    #[test]
    fn rows_covering_clips_partial_rows() {
        let r = region();
        assert_eq!(r.rows_covering(Interval::new(15, 31)), Some(0..3));
        assert_eq!(r.rows_covering(Interval::new(20, 30)), Some(1..2));
        assert_eq!(r.rows_covering(Interval::new(60, 65)), None);
        assert_eq!(r.rows_covering(Interval::new(-50, 0)), None);
    }

    #[test]
    fn row_alignment_is_relative_to_bottom() {
        let r = region();
        assert!(r.is_row_aligned(30));
        assert!(!r.is_row_aligned(35));
    }
}
