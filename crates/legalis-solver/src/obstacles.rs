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

//! Static obstacle precompute: per-row free space left by fixed blocks.

use crate::freespace::RowFreeSpace;
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{block::Block, region::PlacementRegion};
use rayon::prelude::*;
use tracing::{instrument, trace};

/// Obstacle x-spans of `row`, clipped to the region and unmerged.
fn row_obstacle_spans(
    region: &PlacementRegion,
    obstacles: &[&Block],
    row: usize,
) -> Vec<Interval<Coord>> {
    let row_span = region.row_span(row);
    obstacles
        .iter()
        .filter(|b| b.footprint().y_span().overlaps(&row_span))
        .filter_map(|b| b.footprint().x_span().intersection(&region.x_span()))
        .collect()
}

/// Free space of every row with all obstacles (blocks that are not relocatable) removed.
///
/// Obstacle footprints are clipped to the region and to whole rows: a row is blocked
/// wherever any part of it is covered. Free intervals narrower than the region's minimum
/// block width are dropped. Rows are independent, so they are derived in parallel.
#[instrument(skip_all, fields(rows = region.row_count()))]
pub fn row_free_space(region: &PlacementRegion, blocks: &[Block]) -> Vec<RowFreeSpace> {
    let obstacles: Vec<&Block> = blocks.iter().filter(|b| b.is_obstacle()).collect();
    (0..region.row_count())
        .into_par_iter()
        .map(|row| {
            let merged = RowFreeSpace::from_vec(row_obstacle_spans(region, &obstacles, row));
            let mut free = merged.gaps_within(region.x_span());
            free.remove_shorter_than(region.min_block_width());
            trace!(row, intervals = free.len(), "row free space");
            free
        })
        .collect()
}

/// Free space of one row with obstacles and the given extra spans removed.
pub fn row_free_space_excluding(
    free: &RowFreeSpace,
    occupied: impl IntoIterator<Item = Interval<Coord>>,
) -> RowFreeSpace {
    let mut out = free.clone();
    for span in occupied {
        out.subtract_interval(span);
    }
    out
}
