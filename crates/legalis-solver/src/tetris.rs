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

//! Greedy Tetris-style legalizer on top of [`GridSpace`].

use crate::config::TetrisConfig;
use crate::err::{GridSpaceError, LegalizeError};
use crate::grid::GridSpace;
use legalis_core::Coord;
use legalis_model::{block::Block, id::BlockId, placement::Placement};
use tracing::{info, instrument, trace};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TetrisOutcome {
    pub success: bool,
    pub failed: Vec<BlockId>,
}

/// Places blocks one by one at the nearest free footprint of the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TetrisLegalizer {
    config: TetrisConfig,
}

impl TetrisLegalizer {
    #[inline]
    pub fn new(config: TetrisConfig) -> Self {
        Self { config }
    }

    fn order(&self, blocks: &[Block]) -> Vec<BlockId> {
        let mut ids: Vec<&Block> = blocks.iter().filter(|b| b.is_relocatable()).collect();
        ids.sort_by(|a, b| {
            let tall = if self.config.tallest_first {
                b.height().cmp(&a.height())
            } else {
                std::cmp::Ordering::Equal
            };
            tall.then(a.x().total_cmp(&b.x()))
                .then(a.y().total_cmp(&b.y()))
        });
        ids.into_iter().map(Block::id).collect()
    }

    #[instrument(skip_all, fields(blocks = placement.len()))]
    pub fn run(&self, placement: &mut Placement) -> Result<TetrisOutcome, LegalizeError> {
        let (region, blocks) = placement.parts_mut();
        let mut grid = GridSpace::from_obstacles(*region, blocks);
        let mut outcome = TetrisOutcome::default();

        for id in self.order(blocks) {
            let block = &mut blocks[id.index()];
            match grid.find_nearest_legal_location(
                block.x(),
                block.y(),
                block.width(),
                block.height(),
            ) {
                Ok(loc) => block.set_location(loc.x, loc.y),
                Err(GridSpaceError::Infeasible { .. }) => {
                    let x = (block.x().round() as Coord)
                        .min(region.right() - block.width())
                        .max(region.left());
                    let row = region.nearest_row(block.y());
                    trace!(%id, "no free footprint");
                    block.set_location(x, region.row_bottom(row));
                    outcome.failed.push(id);
                }
                Err(GridSpaceError::Allocation(e)) => return Err(e.into()),
            }
        }

        outcome.success = outcome.failed.is_empty();
        info!(
            success = outcome.success,
            failed = outcome.failed.len(),
            "tetris finished"
        );
        Ok(outcome)
    }
}
