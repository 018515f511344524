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

use crate::abacus::DisplacementCost;
use legalis_core::Coord;

#[derive(Debug, Clone, PartialEq)]
pub struct CompactionConfig {
    pub cost: DisplacementCost,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            cost: DisplacementCost::Quadratic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Upper bound on alternating passes.
    pub max_iter: usize,
    /// Initial slack, in block widths, a block may move against the sweep direction.
    pub k_left: f64,
    /// Added to `k_left` after every failed pass. Defaults to one block width.
    pub k_left_step: f64,
    /// Sort bias per unit of block width.
    pub k_width: f64,
    /// Sort bias per unit of block height.
    pub k_height: f64,
    /// Half height of the row search window in block heights.
    pub search_window_factor: f64,
    /// Row compaction after a successful sweep; `None` keeps the sweep result.
    pub compaction: Option<CompactionConfig>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_iter: 20,
            k_left: 0.5,
            k_left_step: 1.0,
            k_width: 0.0,
            k_height: 0.0,
            search_window_factor: 4.0,
            compaction: Some(CompactionConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TetrisConfig {
    /// Place taller blocks first (then by x) instead of a plain x order.
    pub tallest_first: bool,
}

/// Geometry of the well-tap cell inserted into clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct WellTapSpec {
    pub width: Coord,
    /// Free space kept next to every tap.
    pub clearance: Coord,
}

impl Default for WellTapSpec {
    fn default() -> Self {
        Self {
            width: 2,
            clearance: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WellLegalizerConfig {
    /// Width of the placement columns; `None` derives it from the cell widths.
    pub column_width: Option<Coord>,
    pub max_plug_distance_p: Coord,
    pub max_plug_distance_n: Coord,
    /// Insert well taps when set.
    pub tap: Option<WellTapSpec>,
    /// Orientation of clusters starting in even rows; odd rows get the other one.
    pub first_row_orient_n: bool,
    /// Minimum vertical distance between a p-well and an n-well of clusters stacked in one
    /// stripe. `1` only forbids them to touch.
    pub well_spacing: Coord,
    /// Reconciliation rounds for cells that span several clusters.
    pub anchor_iterations: usize,
    pub cost: DisplacementCost,
    /// Coarse row sweep run before clustering; `None` skips it.
    pub base_sweep: Option<SweepConfig>,
}

impl Default for WellLegalizerConfig {
    fn default() -> Self {
        Self {
            column_width: None,
            max_plug_distance_p: 2_000,
            max_plug_distance_n: 2_000,
            tap: None,
            first_row_orient_n: true,
            well_spacing: 1,
            anchor_iterations: 5,
            cost: DisplacementCost::Quadratic,
            base_sweep: Some(SweepConfig {
                compaction: None,
                ..SweepConfig::default()
            }),
        }
    }
}
