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

//! Multi-row free-space lookup.
//!
//! [`GridSpace`] keeps one [`RowFreeSpace`] per row and answers "where is the closest free
//! footprint of this size" by intersecting the free space of consecutive rows inside a
//! window around the target that doubles until something fits.

use crate::err::GridSpaceError;
use crate::freespace::{AllocationError, RowFreeSpace};
use crate::obstacles::row_free_space;
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{block::Block, region::PlacementRegion};
use tracing::trace;

/// A footprint location handed out by [`GridSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridLocation {
    pub x: Coord,
    pub y: Coord,
    /// Lowest row covered.
    pub row: usize,
}

/// Initial half window in multiples of the block's row count.
const INITIAL_WINDOW_FACTOR: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GridSpace {
    region: PlacementRegion,
    rows: Vec<RowFreeSpace>,
}

impl GridSpace {
    /// An empty grid: every row free over the whole region width.
    pub fn new(region: PlacementRegion) -> Self {
        let rows = (0..region.row_count())
            .map(|_| RowFreeSpace::full(region.x_span()))
            .collect();
        Self { region, rows }
    }

    /// A grid with every obstacle in `blocks` already removed.
    pub fn from_obstacles(region: PlacementRegion, blocks: &[Block]) -> Self {
        Self {
            rows: row_free_space(&region, blocks),
            region,
        }
    }

    #[inline]
    pub fn region(&self) -> &PlacementRegion {
        &self.region
    }

    #[inline]
    pub fn rows(&self) -> &[RowFreeSpace] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, row: usize) -> &RowFreeSpace {
        &self.rows[row]
    }

    /// Free space common to rows `start..start + count`.
    pub fn common_free_space(&self, start: usize, count: usize) -> RowFreeSpace {
        let mut common = self.rows[start].clone();
        for row in &self.rows[start + 1..start + count] {
            if common.is_empty() {
                break;
            }
            common.intersect(row);
        }
        common
    }

    /// Whether `[x, x + width)` is free in rows `start..start + count`.
    pub fn is_available(&self, x: Coord, width: Coord, start: usize, count: usize) -> bool {
        start + count <= self.rows.len()
            && self.rows[start..start + count]
                .iter()
                .all(|r| r.is_available(x, width))
    }

    /// Best candidate among start rows `lo..=hi`, measured by Manhattan distance.
    fn best_in_window(
        &self,
        tx: f64,
        ty: f64,
        width: Coord,
        k: usize,
        lo: usize,
        hi: usize,
    ) -> Option<(GridLocation, f64)> {
        let target_x = tx.round() as Coord;
        let mut best: Option<(GridLocation, f64)> = None;
        for start in lo..=hi {
            let mut common = self.common_free_space(start, k);
            common.remove_shorter_than(width);
            let Some(x) = common.nearest_fit(target_x, width) else {
                continue;
            };
            let y = self.region.row_bottom(start);
            let cost = (x as f64 - tx).abs() + (y as f64 - ty).abs();
            if best.is_none_or(|(_, c)| cost < c) {
                best = Some((GridLocation { x, y, row: start }, cost));
            }
        }
        best
    }

    /// Finds the free footprint of `width x height` closest to `(tx, ty)` without claiming it.
    pub fn find_nearest_location(
        &self,
        tx: f64,
        ty: f64,
        width: Coord,
        height: Coord,
    ) -> Result<GridLocation, GridSpaceError> {
        let k = self.region.rows_spanned(height);
        let Some(max_start) = self.region.max_start_row(height) else {
            return Err(GridSpaceError::Infeasible { width, height });
        };
        let center = self.region.nearest_row(ty).min(max_start);
        let mut half = INITIAL_WINDOW_FACTOR * k;
        loop {
            let lo = center.saturating_sub(half);
            let hi = (center + half).min(max_start);
            if let Some((loc, cost)) = self.best_in_window(tx, ty, width, k, lo, hi) {
                trace!(x = loc.x, y = loc.y, cost, half, "grid candidate");
                return Ok(loc);
            }
            if lo == 0 && hi == max_start {
                return Err(GridSpaceError::Infeasible { width, height });
            }
            half *= 2;
        }
    }

    /// Marks `[x, x + width)` used in every row covered by a block of `height` at `row`.
    pub fn occupy(
        &mut self,
        x: Coord,
        width: Coord,
        row: usize,
        height: Coord,
    ) -> Result<(), AllocationError<Coord>> {
        let k = self.region.rows_spanned(height);
        if !self.is_available(x, width, row, k) {
            return Err(AllocationError::new(Interval::new(x, x + width)));
        }
        for free in &mut self.rows[row..row + k] {
            free.allocate(x, width)?;
        }
        Ok(())
    }

    /// Finds the nearest free footprint and claims it in every covered row.
    pub fn find_nearest_legal_location(
        &mut self,
        tx: f64,
        ty: f64,
        width: Coord,
        height: Coord,
    ) -> Result<GridLocation, GridSpaceError> {
        let loc = self.find_nearest_location(tx, ty, width, height)?;
        self.occupy(loc.x, width, loc.row, height)?;
        Ok(loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalis_model::id::BlockId;

    fn region() -> PlacementRegion {
        PlacementRegion::new(0, 100, 0, 50, 10, 1).expect("valid region")
    }

    #[test]
    fn empty_grid_places_at_target() {
        let mut g = GridSpace::new(region());
        let loc = g
            .find_nearest_legal_location(12.4, 21.0, 10, 10)
            .expect("free grid");
        assert_eq!(loc, GridLocation { x: 12, y: 20, row: 2 });
        assert!(!g.row(2).is_available(12, 10));
        assert!(g.row(1).is_available(12, 10));
    }

    #[test]
    fn obstacle_pushes_block_to_the_closer_side() {
        let blocks = vec![Block::fixed(BlockId::new(0), 20, 50, 45, 0)];
        let mut g = GridSpace::from_obstacles(region(), &blocks);
        let loc = g.find_nearest_legal_location(50.0, 0.0, 20, 10).expect("fits");
        assert_eq!((loc.x, loc.y), (65, 0), "65 is 15 away, 25 is 25 away");
        let loc = g.find_nearest_legal_location(30.0, 0.0, 20, 10).expect("fits");
        assert_eq!((loc.x, loc.y), (25, 0));
    }

    #[test]
    fn multi_row_blocks_need_space_in_every_row() {
        let blocks = vec![Block::fixed(BlockId::new(0), 100, 10, 0, 10)];
        let mut g = GridSpace::from_obstacles(region(), &blocks);
        // Row 1 is blocked, so a double-height block cannot start in rows 0 or 1.
        let loc = g.find_nearest_legal_location(0.0, 0.0, 10, 20).expect("fits above");
        assert_eq!(loc.row, 2);
        assert!(!g.row(2).is_available(0, 10));
        assert!(!g.row(3).is_available(0, 10));
    }

    #[test]
    fn window_grows_until_a_row_fits() {
        let blocks = vec![Block::fixed(BlockId::new(0), 100, 40, 0, 0)];
        let g = GridSpace::from_obstacles(region(), &blocks);
        let loc = g.find_nearest_location(0.0, 0.0, 10, 10).expect("top row free");
        assert_eq!(loc.row, 4);
    }

    #[test]
    fn no_wide_enough_row_is_infeasible() {
        let blocks = vec![Block::fixed(BlockId::new(0), 20, 50, 40, 0)];
        let mut g = GridSpace::from_obstacles(region(), &blocks);
        let before = g.clone();
        let err = g.find_nearest_legal_location(0.0, 0.0, 50, 10).unwrap_err();
        assert!(matches!(err, GridSpaceError::Infeasible { width: 50, .. }));
        assert_eq!(g, before, "a failed lookup must not claim space");
        assert!(g.find_nearest_location(0.0, 0.0, 10, 60).is_err());
    }

    #[test]
    fn ties_go_to_the_first_row_found() {
        let mut g = GridSpace::new(region());
        // Rows 1 and 2 are equally far from y = 15.
        let loc = g.find_nearest_legal_location(0.0, 15.0, 5, 10).expect("fits");
        assert_eq!(loc.row, 1);
    }
}
