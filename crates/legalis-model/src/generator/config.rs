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

use legalis_core::Coord;
use rand::Rng;

use super::err::{CellWidthRangeError, InstanceGenConfigBuildError};

/// Well geometry of generated cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellGenSpec {
    /// Share of a row taken by the p-well of a single-height cell.
    pub p_fraction: f64,
}

impl Default for WellGenSpec {
    fn default() -> Self {
        Self { p_fraction: 0.5 }
    }
}

/// Configuration for synthetic placement instances (grid units).
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGenConfig {
    pub(crate) region_width: Coord,
    pub(crate) row_count: usize,
    pub(crate) row_height: Coord,

    pub(crate) min_cell_width: Coord,
    pub(crate) max_cell_width: Coord,
    pub(crate) double_height_fraction: f64,

    pub(crate) amount_movables: usize,
    pub(crate) amount_fixed: usize,
    pub(crate) min_macro_width: Coord,
    pub(crate) max_macro_width: Coord,
    pub(crate) max_macro_rows: usize,

    pub(crate) max_utilization: f64,
    pub(crate) jitter_sigma: f64,
    pub(crate) wells: Option<WellGenSpec>,

    pub(crate) seed: u64,
}

impl Default for InstanceGenConfig {
    fn default() -> Self {
        Self {
            region_width: 400,
            row_count: 20,
            row_height: 12,
            min_cell_width: 2,
            max_cell_width: 16,
            double_height_fraction: 0.0,
            amount_movables: 200,
            amount_fixed: 4,
            min_macro_width: 20,
            max_macro_width: 60,
            max_macro_rows: 4,
            max_utilization: 0.7,
            jitter_sigma: 6.0,
            wells: None,
            seed: 42,
        }
    }
}

impl InstanceGenConfig {
    #[inline]
    pub fn region_width(&self) -> Coord {
        self.region_width
    }
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }
    #[inline]
    pub fn row_height(&self) -> Coord {
        self.row_height
    }
    #[inline]
    pub fn amount_movables(&self) -> usize {
        self.amount_movables
    }
    #[inline]
    pub fn amount_fixed(&self) -> usize {
        self.amount_fixed
    }
    #[inline]
    pub fn max_utilization(&self) -> f64 {
        self.max_utilization
    }
    #[inline]
    pub fn wells(&self) -> Option<WellGenSpec> {
        self.wells
    }
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGenConfigBuilder {
    region_width: Option<Coord>,
    row_count: Option<usize>,
    amount_movables: Option<usize>,
    base: InstanceGenConfig,
}

impl Default for InstanceGenConfigBuilder {
    fn default() -> Self {
        Self {
            region_width: None,
            row_count: None,
            amount_movables: None,
            base: InstanceGenConfig::default(),
        }
    }
}

impl InstanceGenConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn region_width(mut self, v: Coord) -> Self {
        self.region_width = Some(v);
        self
    }
    #[inline]
    pub fn row_count(mut self, v: usize) -> Self {
        self.row_count = Some(v);
        self
    }
    #[inline]
    pub fn row_height(mut self, v: Coord) -> Self {
        self.base.row_height = v;
        self
    }
    #[inline]
    pub fn amount_movables(mut self, v: usize) -> Self {
        self.amount_movables = Some(v);
        self
    }
    #[inline]
    pub fn amount_fixed(mut self, v: usize) -> Self {
        self.base.amount_fixed = v;
        self
    }
    pub fn cell_width_range(mut self, min: Coord, max: Coord) -> Self {
        self.base.min_cell_width = min;
        self.base.max_cell_width = max;
        self
    }
    pub fn macro_width_range(mut self, min: Coord, max: Coord) -> Self {
        self.base.min_macro_width = min;
        self.base.max_macro_width = max.max(min);
        self
    }
    #[inline]
    pub fn max_macro_rows(mut self, v: usize) -> Self {
        self.base.max_macro_rows = v.max(1);
        self
    }
    #[inline]
    pub fn double_height_fraction(mut self, v: f64) -> Self {
        self.base.double_height_fraction = v.clamp(0.0, 1.0);
        self
    }
    #[inline]
    pub fn max_utilization(mut self, v: f64) -> Self {
        self.base.max_utilization = v;
        self
    }
    #[inline]
    pub fn jitter_sigma(mut self, v: f64) -> Self {
        self.base.jitter_sigma = v;
        self
    }
    #[inline]
    pub fn wells(mut self, spec: WellGenSpec) -> Self {
        self.base.wells = Some(spec);
        self
    }
    pub fn random_seed(mut self) -> Self {
        self.base.seed = rand::rng().random();
        self
    }
    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.base.seed = v;
        self
    }

    pub fn build(self) -> Result<InstanceGenConfig, InstanceGenConfigBuildError> {
        use InstanceGenConfigBuildError::*;
        let region_width = self.region_width.ok_or(MissingRegionWidth)?;
        let row_count = self.row_count.ok_or(MissingRowCount)?;
        let amount_movables = self.amount_movables.ok_or(MissingAmountMovables)?;
        let base = self.base;

        if base.min_cell_width <= 0
            || base.min_cell_width > base.max_cell_width
            || base.max_cell_width > region_width
        {
            return Err(CellWidthRangeError::new(
                base.min_cell_width,
                base.max_cell_width,
                region_width,
            )
            .into());
        }
        if !(base.max_utilization > 0.0 && base.max_utilization <= 1.0) {
            return Err(InvalidUtilization(base.max_utilization));
        }
        if !base.jitter_sigma.is_finite() || base.jitter_sigma < 0.0 {
            return Err(InvalidJitter(base.jitter_sigma));
        }

        Ok(InstanceGenConfig {
            region_width,
            row_count: row_count.max(1),
            row_height: base.row_height.max(1),
            amount_movables,
            ..base
        })
    }
}
