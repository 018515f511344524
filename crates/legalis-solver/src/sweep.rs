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

//! Contour-based row-sweep legalizer.
//!
//! Movable blocks are visited in x order (ascending on left passes, descending on right
//! passes). Each row keeps a contour: the frontier of space already handed to blocks in the
//! current pass. A block keeps its snapped location when that spot is inside static free
//! space and behind the contour of every row it spans; otherwise it goes to the cheapest
//! location in a window of rows around its target. A pass succeeds when every block found a
//! legal location. Failed passes flip the direction and relax `k_left` until `max_iter`.

use crate::compaction::RowCompactor;
use crate::config::SweepConfig;
use crate::err::LegalizeError;
use crate::freespace::RowFreeSpace;
use crate::obstacles::row_free_space;
use crate::policy::{AnyRow, RowFit};
use legalis_core::Coord;
use legalis_model::{block::Block, id::BlockId, placement::Placement, region::PlacementRegion};
use std::fmt::Display;
use std::ops::RangeInclusive;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepDirection {
    /// Blocks are packed towards the left edge.
    Left,
    /// Blocks are packed towards the right edge.
    Right,
}

impl SweepDirection {
    /// Direction of the 1-based pass `pass`.
    #[inline]
    pub fn of_pass(pass: usize) -> Self {
        if pass % 2 == 1 {
            SweepDirection::Left
        } else {
            SweepDirection::Right
        }
    }
}

impl Display for SweepDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepDirection::Left => write!(f, "left"),
            SweepDirection::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SweepOutcome {
    pub success: bool,
    pub passes: usize,
    /// Blocks without a legal location in the last pass.
    pub failed: Vec<BlockId>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    x: Coord,
    row: usize,
    cost: f64,
}

impl Candidate {
    #[inline]
    fn improves_on(&self, other: &Option<Candidate>) -> bool {
        other.is_none_or(|o| self.cost < o.cost)
    }
}

/// Scratch state of one pass.
struct Pass<'a, P> {
    region: &'a PlacementRegion,
    free: &'a [RowFreeSpace],
    policy: &'a P,
    config: &'a SweepConfig,
    direction: SweepDirection,
    index: usize,
    k_left: f64,
    contour: Vec<Coord>,
}

#[inline]
fn clamp_start(x: Coord, lo: Coord, hi: Coord) -> Coord {
    x.min(hi).max(lo)
}

impl<P: RowFit> Pass<'_, P> {
    fn order(&self, blocks: &[Block]) -> Vec<BlockId> {
        let cfg = self.config;
        let mut keyed: Vec<(f64, f64, BlockId)> = blocks
            .iter()
            .filter(|b| b.is_relocatable())
            .map(|b| {
                let bias = cfg.k_width * b.width() as f64 + cfg.k_height * b.height() as f64;
                match self.direction {
                    SweepDirection::Left => (b.x() - bias, b.y(), b.id()),
                    SweepDirection::Right => (-(b.ux() + bias), -b.y(), b.id()),
                }
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }

    fn rows_of(&self, start: usize, k: usize) -> std::ops::Range<usize> {
        start..(start + k).min(self.contour.len())
    }

    /// Whether `[x, x + width)` at start row `row` is free and behind the contour.
    fn is_legal(&self, block: &Block, x: Coord, row: usize, k: usize) -> bool {
        if !self.policy.admits(row, block) || row + k > self.free.len() {
            return false;
        }
        let w = block.width();
        self.rows_of(row, k).all(|r| {
            self.free[r].is_available(x, w)
                && match self.direction {
                    SweepDirection::Left => self.contour[r] <= x,
                    SweepDirection::Right => x + w <= self.contour[r],
                }
        })
    }

    /// Evaluates start row `row`. Returns the cheapest fully legal location there, if any, and
    /// the best-effort location used when no row has one.
    fn evaluate(
        &self,
        block: &Block,
        row: usize,
        k: usize,
    ) -> (Option<Candidate>, Candidate) {
        let w = block.width();
        let (tx, ty) = (block.x(), block.y());
        let mut common = self.free[row].clone();
        for r in self.rows_of(row, k).skip(1) {
            common.intersect(&self.free[r]);
        }
        let slack = self.k_left * w as f64;
        let (legal_x, effort_x) = match self.direction {
            SweepDirection::Left => {
                let contour = self.rows_of(row, k).map(|r| self.contour[r]).max();
                let lower = contour
                    .unwrap_or(self.region.left())
                    .max((tx - slack).round() as Coord);
                (
                    common.first_fit_at_or_after(lower, w),
                    clamp_start(lower, self.region.left(), self.region.right() - w),
                )
            }
            SweepDirection::Right => {
                let contour = self.rows_of(row, k).map(|r| self.contour[r]).min();
                let upper = contour
                    .unwrap_or(self.region.right())
                    .min((tx + w as f64 + slack).round() as Coord);
                (
                    common.last_fit_ending_at_or_before(upper, w),
                    clamp_start(upper - w, self.region.left(), self.region.right() - w),
                )
            }
        };
        let y = self.region.row_bottom(row) as f64;
        let cost_of = |x: Coord| (x as f64 - tx).abs() + (y - ty).abs();
        let legal = legal_x.map(|x| Candidate {
            x,
            row,
            cost: cost_of(x),
        });
        let effort = Candidate {
            x: effort_x,
            row,
            cost: cost_of(effort_x),
        };
        (legal, effort)
    }

    fn scan(
        &self,
        block: &Block,
        rows: impl Iterator<Item = usize>,
        k: usize,
        legal: &mut Option<Candidate>,
        effort: &mut Option<Candidate>,
    ) {
        for row in rows {
            if !self.policy.admits(row, block) {
                continue;
            }
            let (l, e) = self.evaluate(block, row, k);
            if let Some(l) = l
                && l.improves_on(legal)
            {
                *legal = Some(l);
            }
            if e.improves_on(effort) {
                *effort = Some(e);
            }
        }
    }

    fn window(&self, block: &Block, max_start: usize) -> RangeInclusive<usize> {
        let rh = self.region.row_height() as f64;
        let half = (self.config.search_window_factor * block.height() as f64 / rh).ceil() as usize;
        let center = self.region.nearest_row(block.y()).min(max_start);
        center.saturating_sub(half)..=(center + half).min(max_start)
    }

    /// Finds a location for `block`. The flag is `false` when the location is best effort.
    fn locate(&self, block: &Block) -> (Coord, usize, bool) {
        let region = self.region;
        let w = block.width();
        let Some(max_start) = region.max_start_row(block.height()) else {
            let x = clamp_start(block.x().round() as Coord, region.left(), region.right() - w);
            return (x, 0, false);
        };
        let k = region.rows_spanned(block.height());

        let row = region.nearest_row(block.y()).min(max_start);
        let x = block.x().round() as Coord;
        if self.is_legal(block, x, row, k) {
            return (x, row, true);
        }

        let window = self.window(block, max_start);
        let (lo, hi) = (*window.start(), *window.end());
        let mut legal = None;
        let mut effort = None;
        self.scan(block, window, k, &mut legal, &mut effort);
        if legal.is_none() {
            let extra = self.index * k;
            let wide_lo = lo.saturating_sub(extra);
            let wide_hi = (hi + extra).min(max_start);
            self.scan(block, (wide_lo..lo).chain(hi + 1..=wide_hi), k, &mut legal, &mut effort);
        }

        match (legal, effort) {
            (Some(c), _) => (c.x, c.row, true),
            (None, Some(c)) => (c.x, c.row, false),
            (None, None) => {
                let x = clamp_start(x, region.left(), region.right() - w);
                (x, row, false)
            }
        }
    }

    fn commit(&mut self, block: &mut Block, x: Coord, row: usize) {
        let k = self.region.rows_spanned(block.height());
        block.set_location(x, self.region.row_bottom(row));
        block.set_orientation(self.policy.orientation(row, block));
        for r in self.rows_of(row, k) {
            self.contour[r] = match self.direction {
                SweepDirection::Left => self.contour[r].max(x + block.width()),
                SweepDirection::Right => self.contour[r].min(x),
            };
        }
    }

    fn run(&mut self, blocks: &mut [Block]) -> Vec<BlockId> {
        let mut failed = Vec::new();
        for id in self.order(blocks) {
            let block = &mut blocks[id.index()];
            let (x, row, ok) = self.locate(block);
            if !ok {
                trace!(%id, x, row, "no legal location");
                failed.push(id);
            }
            self.commit(block, x, row);
        }
        failed
    }
}

/// Row-sweep legalizer, generic over the row-fit strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSweepLegalizer<P = AnyRow> {
    config: SweepConfig,
    policy: P,
}

impl Default for RowSweepLegalizer<AnyRow> {
    fn default() -> Self {
        Self::new(SweepConfig::default())
    }
}

impl RowSweepLegalizer<AnyRow> {
    #[inline]
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            policy: AnyRow,
        }
    }
}

impl<P: RowFit> RowSweepLegalizer<P> {
    #[inline]
    pub fn with_policy(config: SweepConfig, policy: P) -> Self {
        Self { config, policy }
    }

    #[inline]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Legalizes every relocatable block of `placement` in place.
    ///
    /// Non-convergence is reported through [`SweepOutcome::success`]; blocks then keep the
    /// best-effort locations of the last pass.
    #[instrument(skip_all, fields(blocks = placement.len(), max_iter = self.config.max_iter))]
    pub fn run(&self, placement: &mut Placement) -> Result<SweepOutcome, LegalizeError> {
        let targets: Vec<Block> = placement.blocks().to_vec();
        let (region, blocks) = placement.parts_mut();
        let free = row_free_space(region, blocks);

        let mut outcome = SweepOutcome::default();
        let mut k_left = self.config.k_left;
        for index in 1..=self.config.max_iter.max(1) {
            let direction = SweepDirection::of_pass(index);
            let edge = match direction {
                SweepDirection::Left => region.left(),
                SweepDirection::Right => region.right(),
            };
            let mut pass = Pass {
                region,
                free: &free,
                policy: &self.policy,
                config: &self.config,
                direction,
                index,
                k_left,
                contour: vec![edge; free.len()],
            };
            outcome.failed = pass.run(blocks);
            outcome.passes = index;
            debug!(pass = index, %direction, k_left, failed = outcome.failed.len(), "sweep pass");
            if outcome.failed.is_empty() {
                outcome.success = true;
                break;
            }
            k_left += self.config.k_left_step;
        }

        if outcome.success {
            if let Some(cfg) = &self.config.compaction {
                RowCompactor::new(cfg.clone()).compact(placement, &targets)?;
            }
        } else {
            warn!(failed = outcome.failed.len(), "row sweep did not converge");
        }
        info!(
            success = outcome.success,
            passes = outcome.passes,
            failed = outcome.failed.len(),
            "row sweep finished"
        );
        Ok(outcome)
    }
}
