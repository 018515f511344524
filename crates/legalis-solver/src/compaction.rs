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

//! Row compaction: pulls single-row blocks back towards their original x.
//!
//! Runs on an already legal placement. Every row is cut into segments by obstacles and by
//! multi-row blocks, which stay where they are. Inside a segment the single-row blocks keep
//! their left-to-right order and are re-placed by the displacement optimizer.

use crate::abacus::{DisplacementCost, DisplacementOptimizer, Variable, abacus_place_row};
use crate::config::CompactionConfig;
use crate::err::OptimizerError;
use crate::obstacles::{row_free_space, row_free_space_excluding};
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{block::Block, id::BlockId, placement::Placement};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompactionOutcome {
    pub segments: usize,
    pub moved: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowCompactor {
    config: CompactionConfig,
}

impl RowCompactor {
    #[inline]
    pub fn new(config: CompactionConfig) -> Self {
        Self { config }
    }

    fn place_segment(
        &self,
        cells: &[(Coord, f64)],
        lower: Coord,
        upper: Coord,
    ) -> Result<Vec<Coord>, OptimizerError> {
        match self.config.cost {
            DisplacementCost::Quadratic => abacus_place_row(cells, lower, upper),
            cost => {
                let vars: Vec<Variable> =
                    cells.iter().map(|&(w, x)| Variable::new(w, x)).collect();
                DisplacementOptimizer::new(cost).optimize(&vars, lower, upper)
            }
        }
    }

    /// Compacts `placement` towards the x positions in `targets`, a snapshot of the same
    /// placement taken before legalization.
    #[instrument(skip_all, fields(blocks = placement.len()))]
    pub fn compact(
        &self,
        placement: &mut Placement,
        targets: &[Block],
    ) -> Result<CompactionOutcome, OptimizerError> {
        let region = *placement.region();
        let free = row_free_space(&region, placement.blocks());

        let mut singles: Vec<Vec<BlockId>> = vec![Vec::new(); region.row_count()];
        let mut tall: Vec<Vec<Interval<Coord>>> = vec![Vec::new(); region.row_count()];
        for b in placement.blocks().iter().filter(|b| b.is_relocatable()) {
            let Some(rows) = region.rows_covering(b.footprint().y_span()) else {
                continue;
            };
            if region.rows_spanned(b.height()) == 1 && region.is_row_aligned(b.ly()) {
                singles[rows.start].push(b.id());
            } else {
                for r in rows {
                    tall[r].push(b.footprint().x_span());
                }
            }
        }

        let mut outcome = CompactionOutcome::default();
        let mut moves: Vec<(BlockId, Coord)> = Vec::new();
        for (row, ids) in singles.iter_mut().enumerate() {
            if ids.is_empty() {
                continue;
            }
            ids.sort_by_key(|&id| placement.block(id).lx());
            let segments = row_free_space_excluding(&free[row], tall[row].iter().copied());
            for seg in &segments {
                let members: Vec<BlockId> = ids
                    .iter()
                    .copied()
                    .filter(|&id| seg.contains_interval(&placement.block(id).footprint().x_span()))
                    .collect();
                if members.is_empty() {
                    continue;
                }
                let cells: Vec<(Coord, f64)> = members
                    .iter()
                    .map(|&id| (placement.block(id).width(), targets[id.index()].x()))
                    .collect();
                let xs = self.place_segment(&cells, seg.start(), seg.end())?;
                outcome.segments += 1;
                moves.extend(members.into_iter().zip(xs));
            }
        }

        for (id, x) in moves {
            let block = placement.block_mut(id);
            if block.x() != x as f64 {
                outcome.moved += 1;
            }
            let y = block.ly();
            block.set_location(x, y);
        }
        debug!(segments = outcome.segments, moved = outcome.moved, "row compaction");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalis_model::{placement::PlacementBuilder, region::PlacementRegion};

    fn region() -> PlacementRegion {
        PlacementRegion::new(0, 100, 0, 20, 10, 1).expect("valid region")
    }

    #[test]
    fn cells_slide_back_towards_targets() {
        let mut b = PlacementBuilder::new(region());
        b.add_block(Block::movable(BlockId::new(0), 10, 10, 50.0, 0.0))
            .expect("ok")
            .add_block(Block::movable(BlockId::new(1), 10, 10, 70.0, 0.0))
            .expect("ok");
        let targets = b.build();
        let mut placed = targets.clone();
        placed.block_mut(BlockId::new(0)).set_location(0, 0);
        placed.block_mut(BlockId::new(1)).set_location(10, 0);

        let out = RowCompactor::default()
            .compact(&mut placed, targets.blocks())
            .expect("legal input");
        assert_eq!(out.moved, 2);
        assert_eq!(placed.block(BlockId::new(0)).lx(), 50);
        assert_eq!(placed.block(BlockId::new(1)).lx(), 70);
    }

    #[test]
    fn obstacles_and_tall_blocks_bound_segments() {
        let mut b = PlacementBuilder::new(region());
        b.add_block(Block::movable(BlockId::new(0), 10, 10, 80.0, 0.0))
            .expect("ok")
            .add_block(Block::fixed(BlockId::new(1), 10, 10, 40, 0))
            .expect("ok")
            .add_block(Block::movable(BlockId::new(2), 5, 20, 20.0, 0.0))
            .expect("ok");
        let targets = b.build();
        let mut placed = targets.clone();
        placed.block_mut(BlockId::new(0)).set_location(25, 0);

        RowCompactor::default()
            .compact(&mut placed, targets.blocks())
            .expect("legal input");
        // Block 0 sits in [25, 40): bounded by the tall block on the left and the obstacle
        // on the right.
        assert_eq!(placed.block(BlockId::new(0)).lx(), 30);
        assert_eq!(placed.block(BlockId::new(2)).lx(), 20, "tall blocks stay put");
    }

    #[test]
    fn legal_placement_at_its_targets_is_unchanged() {
        let mut b = PlacementBuilder::new(region());
        b.add_block(Block::movable(BlockId::new(0), 10, 10, 5.0, 10.0))
            .expect("ok")
            .add_block(Block::movable(BlockId::new(1), 10, 10, 15.0, 10.0))
            .expect("ok");
        let before = b.build();
        let mut placed = before.clone();
        let out = RowCompactor::default()
            .compact(&mut placed, before.blocks())
            .expect("legal input");
        assert_eq!(out.moved, 0);
        assert_eq!(placed, before);
    }
}
