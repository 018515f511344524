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

//! Seeded synthetic placement instances.
//!
//! Fixed macros are dropped at random row-aligned spots without overlapping each other, then
//! movable cells are scattered over the rows and perturbed with Gaussian jitter, the way a
//! global placer leaves them: roughly spread, slightly overlapping and off the row grid.

mod config;
mod err;

pub use config::{InstanceGenConfig, InstanceGenConfigBuilder, WellGenSpec};
pub use err::{CellWidthRangeError, InstanceGenConfigBuildError};

use crate::block::Block;
use crate::err::RegionError;
use crate::id::BlockId;
use crate::placement::Placement;
use crate::region::PlacementRegion;
use crate::well::{WellRegion, WellShape};
use legalis_core::Coord;
use legalis_core::geometry::Rect;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Normal};

const MACRO_PLACEMENT_ATTEMPTS: usize = 32;

pub struct InstanceGenerator {
    config: InstanceGenConfig,
    rng: SmallRng,
    jitter: Option<Normal<f64>>,
}

impl From<InstanceGenConfig> for InstanceGenerator {
    fn from(config: InstanceGenConfig) -> Self {
        Self::new(config)
    }
}

impl InstanceGenerator {
    pub fn new(config: InstanceGenConfig) -> Self {
        let jitter = if config.jitter_sigma > 0.0 {
            Normal::new(0.0, config.jitter_sigma).ok()
        } else {
            None
        };
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            jitter,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &InstanceGenConfig {
        &self.config
    }

    fn region(&self) -> Result<PlacementRegion, RegionError> {
        let c = &self.config;
        PlacementRegion::new(
            0,
            c.region_width,
            0,
            c.row_count as Coord * c.row_height,
            c.row_height,
            c.min_cell_width,
        )
    }

    #[inline]
    fn jitter(&mut self) -> f64 {
        match self.jitter {
            Some(normal) => normal.sample(&mut self.rng),
            None => 0.0,
        }
    }

    fn well_shape(&self, rows: usize) -> Option<WellShape> {
        let spec = self.config.wells?;
        let rh = self.config.row_height;
        let p = if rh >= 2 {
            ((rh as f64 * spec.p_fraction).round() as Coord).clamp(1, rh - 1)
        } else {
            rh
        };
        let region = WellRegion::new(p, rh - p);
        Some(WellShape::new(vec![region; rows]))
    }

    fn place_macros(&mut self, blocks: &mut Vec<Block>) -> Coord {
        let c = self.config.clone();
        let mut placed: Vec<Rect> = Vec::with_capacity(c.amount_fixed);
        for _ in 0..c.amount_fixed {
            for _ in 0..MACRO_PLACEMENT_ATTEMPTS {
                let w = self
                    .rng
                    .random_range(c.min_macro_width..=c.max_macro_width)
                    .min(c.region_width);
                let rows = self
                    .rng
                    .random_range(1..=c.max_macro_rows)
                    .min(c.row_count);
                let x = self.rng.random_range(0..=c.region_width - w);
                let row = self.rng.random_range(0..=c.row_count - rows);
                let rect = Rect::new(
                    x,
                    row as Coord * c.row_height,
                    w,
                    rows as Coord * c.row_height,
                );
                if placed.iter().all(|p| !p.overlaps(&rect)) {
                    placed.push(rect);
                    let id = BlockId::new(blocks.len());
                    blocks.push(Block::fixed(id, w, rect.height(), rect.lx(), rect.ly()));
                    break;
                }
            }
        }
        placed.iter().map(|r| r.width() * r.height()).sum()
    }

    /// Generates one instance. Consecutive calls continue the same random stream.
    pub fn generate(&mut self) -> Result<Placement, RegionError> {
        let region = self.region()?;
        let c = self.config.clone();
        let mut blocks = Vec::with_capacity(c.amount_fixed + c.amount_movables);

        let macro_area = self.place_macros(&mut blocks);
        let free_area = region.width() * region.height() - macro_area;
        let budget = (free_area as f64 * c.max_utilization) as Coord;

        let mut used_area: Coord = 0;
        for _ in 0..c.amount_movables {
            let width = self.rng.random_range(c.min_cell_width..=c.max_cell_width);
            let rows = if c.row_count >= 2 && self.rng.random_bool(c.double_height_fraction) {
                2
            } else {
                1
            };
            let height = rows as Coord * c.row_height;
            if used_area + width * height > budget {
                break;
            }
            used_area += width * height;

            let row = self.rng.random_range(0..=c.row_count - rows);
            let x = self.rng.random_range(0..=c.region_width - width) as f64 + self.jitter();
            let y = region.row_bottom(row) as f64 + self.jitter();

            let id = BlockId::new(blocks.len());
            let mut block = Block::movable(id, width, height, x, y);
            if let Some(shape) = self.well_shape(rows) {
                block = block.with_well(shape);
            }
            blocks.push(block);
        }

        Ok(Placement::from_parts(region, blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> InstanceGenConfig {
        InstanceGenConfigBuilder::new()
            .region_width(200)
            .row_count(10)
            .amount_movables(150)
            .amount_fixed(3)
            .seed(seed)
            .build()
            .expect("valid config")
    }

    #[test]
    fn same_seed_same_instance() {
        let a = InstanceGenerator::new(config(9)).generate().expect("instance");
        let b = InstanceGenerator::new(config(9)).generate().expect("instance");
        assert_eq!(a, b);
    }

    #[test]
    fn movable_area_respects_utilization() {
        let p = InstanceGenerator::new(config(3)).generate().expect("instance");
        let region = p.region();
        let fixed: Coord = p.blocks().iter().filter(|b| b.is_obstacle()).map(Block::area).sum();
        let movable: Coord = p
            .blocks()
            .iter()
            .filter(|b| b.is_relocatable())
            .map(Block::area)
            .sum();
        let free = (region.width() * region.height() - fixed) as f64;
        assert!(movable as f64 <= 0.7 * free, "movable {} free {}", movable, free);
    }

    #[test]
    fn macros_do_not_overlap_each_other() {
        let p = InstanceGenerator::new(config(5)).generate().expect("instance");
        let macros: Vec<Rect> = p
            .blocks()
            .iter()
            .filter(|b| b.is_obstacle())
            .map(Block::footprint)
            .collect();
        assert!(!macros.is_empty(), "expected at least one macro");
        for (i, a) in macros.iter().enumerate() {
            for b in &macros[i + 1..] {
                assert!(!a.overlaps(b), "macros {} and {} overlap", a, b);
            }
            assert!(p.region().bounds().contains_rect(a), "macro {} outside region", a);
        }
    }

    #[test]
    fn well_shapes_match_block_heights() {
        let cfg = InstanceGenConfigBuilder::new()
            .region_width(200)
            .row_count(10)
            .amount_movables(50)
            .double_height_fraction(0.3)
            .wells(WellGenSpec::default())
            .build()
            .expect("valid config");
        let p = InstanceGenerator::new(cfg).generate().expect("instance");
        for b in p.blocks().iter().filter(|b| b.is_relocatable()) {
            let well = b.well().expect("generated cells carry wells");
            assert_eq!(well.height(), b.height());
        }
    }
}
