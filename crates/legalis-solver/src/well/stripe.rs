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

//! Columns and stripes of the well legalizer.
//!
//! The region is cut into equally wide columns. Inside a column every row keeps the free
//! space left by fixed obstacles, and row segments with the same x-span in consecutive rows
//! merge into one obstacle-free rectangle called a stripe. Blocks are legalized stripe by
//! stripe.

use crate::config::WellLegalizerConfig;
use crate::obstacles::row_free_space;
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{block::Block, id::BlockId, region::PlacementRegion};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripe {
    column: usize,
    x_span: Interval<Coord>,
    y_span: Interval<Coord>,
    blocks: Vec<BlockId>,
}

impl Stripe {
    #[inline]
    pub fn new(column: usize, x_span: Interval<Coord>, y_span: Interval<Coord>) -> Self {
        Self {
            column,
            x_span,
            y_span,
            blocks: Vec::new(),
        }
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn x_span(&self) -> Interval<Coord> {
        self.x_span
    }

    #[inline]
    pub fn y_span(&self) -> Interval<Coord> {
        self.y_span
    }

    #[inline]
    pub fn width(&self) -> Coord {
        self.x_span.length()
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.y_span.length()
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Manhattan distance from a point to the stripe, zero inside.
    fn distance_to(&self, x: Coord, y: Coord) -> Coord {
        let dx = (self.x_span.start() - x).max(x - (self.x_span.end() - 1)).max(0);
        let dy = (self.y_span.start() - y).max(y - (self.y_span.end() - 1)).max(0);
        dx + dy
    }
}

/// Column width used when none is configured: twice the shortest plug distance, never
/// narrower than the widest relocatable block and never wider than the region.
pub fn column_width(
    config: &WellLegalizerConfig,
    region: &PlacementRegion,
    blocks: &[Block],
) -> Coord {
    let widest = blocks
        .iter()
        .filter(|b| b.is_relocatable())
        .map(Block::width)
        .max()
        .unwrap_or(1);
    let wanted = config
        .column_width
        .unwrap_or(2 * config.max_plug_distance_p.min(config.max_plug_distance_n));
    wanted.max(widest).min(region.width()).max(1)
}

/// Cuts `region` into stripes. Stripes carry no blocks yet, see [`assign`].
///
/// Each row of a column contributes its obstacle-free segments. A segment extends the stripe
/// that ended on the row below with the same x-span, otherwise it opens a new stripe.
/// Segments narrower than the minimum block width are dropped. Stripes are ordered by
/// column, then bottom to top, then left to right.
#[instrument(skip_all, fields(column_width = column_width))]
pub fn partition(region: &PlacementRegion, blocks: &[Block], column_width: Coord) -> Vec<Stripe> {
    let columns = ((region.width() + column_width - 1) / column_width).max(1);
    let step = region.width() / columns;
    let rows = row_free_space(region, blocks);

    let mut stripes: Vec<Stripe> = Vec::new();
    for column in 0..columns as usize {
        let lx = region.left() + column as Coord * step;
        let ux = if column as Coord == columns - 1 {
            region.right()
        } else {
            lx + step
        };
        let x_span = Interval::new(lx, ux);

        let mut open: Vec<usize> = Vec::new();
        for (row, free) in rows.iter().enumerate() {
            let row_span = region.row_span(row);
            let mut reached = Vec::with_capacity(open.len());
            for seg in free
                .iter()
                .filter_map(|s| s.intersection(&x_span))
                .filter(|s| s.length() >= region.min_block_width())
            {
                match open.iter().copied().find(|&i| stripes[i].x_span == seg) {
                    Some(i) => {
                        let start = stripes[i].y_span.start();
                        stripes[i].y_span = Interval::new(start, row_span.end());
                        reached.push(i);
                    }
                    None => {
                        stripes.push(Stripe::new(column, seg, row_span));
                        reached.push(stripes.len() - 1);
                    }
                }
            }
            open = reached;
        }
    }

    stripes.sort_by_key(|s| (s.column, s.y_span.start(), s.x_span.start()));
    debug!(stripes = stripes.len(), columns, "stripes partitioned");
    stripes
}

#[derive(Debug, Clone, Copy, Default)]
struct Load {
    rows_used: Coord,
    row_width: Coord,
    widest: Coord,
}

impl Load {
    /// Whether the stripe still clusters into its rows after taking a block of `width`
    /// spanning `spanned` rows. Either every block gets a row of its own, or the row width
    /// stays within what greedy packing cannot strand.
    fn admits(&self, rows: Coord, usable: Coord, width: Coord, spanned: Coord) -> bool {
        let widest = self.widest.max(width);
        self.rows_used + spanned <= rows
            || self.row_width + width * spanned <= rows * (usable - widest + 1)
    }

    fn add(&mut self, width: Coord, spanned: Coord) {
        self.rows_used += spanned;
        self.row_width += width * spanned;
        self.widest = self.widest.max(width);
    }
}

/// Assigns every relocatable block to a stripe and returns how many blocks landed in a
/// stripe that could not take them.
///
/// Stripes are visited nearest first by Manhattan distance from the block's center. A stripe
/// hosts a block that fits its height and its width less `reserve(width)`. The block goes to
/// the nearest hosting stripe with capacity left, else the nearest hosting stripe, else the
/// nearest stripe.
#[instrument(skip_all, fields(stripes = stripes.len()))]
pub fn assign(
    stripes: &mut [Stripe],
    region: &PlacementRegion,
    blocks: &[Block],
    reserve: impl Fn(Coord) -> Coord,
) -> usize {
    if stripes.is_empty() {
        debug!("no obstacle-free stripe in the region");
        return 0;
    }
    let usable: Vec<Coord> = stripes.iter().map(|s| s.width() - reserve(s.width())).collect();
    let rows: Vec<Coord> = stripes.iter().map(|s| s.height() / region.row_height()).collect();
    let mut loads = vec![Load::default(); stripes.len()];
    let mut order: Vec<usize> = (0..stripes.len()).collect();
    let mut spilled = 0;

    for b in blocks.iter().filter(|b| b.is_relocatable()) {
        let cx = b.lx() + b.width() / 2;
        let cy = b.ly() + b.height() / 2;
        let spanned = region.rows_spanned(b.height()) as Coord;
        order.sort_by_key(|&i| (stripes[i].distance_to(cx, cy), i));

        let hosts = |i: usize| b.width() <= usable[i] && b.height() <= stripes[i].height();
        let roomy = order
            .iter()
            .copied()
            .find(|&i| hosts(i) && loads[i].admits(rows[i], usable[i], b.width(), spanned));
        let chosen = match roomy {
            Some(i) => i,
            None => {
                spilled += 1;
                order.iter().copied().find(|&i| hosts(i)).unwrap_or(order[0])
            }
        };
        loads[chosen].add(b.width(), spanned);
        stripes[chosen].blocks.push(b.id());
    }
    if spilled > 0 {
        debug!(spilled, "blocks assigned beyond stripe capacity");
    }
    spilled
}
