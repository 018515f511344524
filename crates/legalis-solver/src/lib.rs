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

//! # Legalizers (`legalis-solver`)
//!
//! Turns a global placement into a legal one: every relocatable block inside the region, on
//! a row, and free of overlaps, while moving blocks as little as possible.
//!
//! ## Free Space
//!
//! - **`IntervalSet`** (alias **`RowFreeSpace`**): sorted, disjoint, non-touching intervals
//!   with allocation and set algebra. [`obstacles::row_free_space`] derives one per row from
//!   the fixed blocks.
//! - **`GridSpace`**: the free space of all rows, answering nearest-footprint queries for
//!   blocks spanning several rows.
//!
//! ## Legalizers
//!
//! - **`TetrisLegalizer`**: greedy, one block at a time at its nearest free footprint.
//! - **`RowSweepLegalizer`**: alternating left and right sweeps with a per-row contour and a
//!   growing search window, generic over a [`policy::RowFit`] strategy. An optional
//!   **`RowCompactor`** pass pulls single-row blocks back towards their original x.
//! - **`ClusterLegalizer`**: well-aware legalization that groups blocks into clusters with
//!   continuous p-well and n-well bands and optionally inserts well taps.
//!
//! All three implement [`legalizer::Legalizer`]. Displacement within a row or a column is
//! minimized by the Abacus-style **`DisplacementOptimizer`** in [`abacus`].
//!
//! ## Errors
//!
//! Only contract breaches are errors ([`err::LegalizeError`]). Blocks that cannot be placed
//! are reported through each legalizer's outcome.

pub mod abacus;
pub mod compaction;
pub mod config;
pub mod err;
pub mod freespace;
pub mod grid;
pub mod legalizer;
pub mod obstacles;
pub mod policy;
pub mod sweep;
pub mod tetris;
pub mod well;

pub mod prelude {
    pub use crate::abacus::{DisplacementCost, DisplacementOptimizer, Variable, abacus_place_row};
    pub use crate::compaction::{CompactionOutcome, RowCompactor};
    pub use crate::config::{
        CompactionConfig, SweepConfig, TetrisConfig, WellLegalizerConfig, WellTapSpec,
    };
    pub use crate::err::{GridSpaceError, LegalizeError, OptimizerError};
    pub use crate::freespace::{AllocationError, IntervalSet, RowFreeSpace};
    pub use crate::grid::{GridLocation, GridSpace};
    pub use crate::legalizer::Legalizer;
    pub use crate::policy::{AnyRow, RowFit, WellRowParity};
    pub use crate::sweep::{RowSweepLegalizer, SweepDirection, SweepOutcome};
    pub use crate::tetris::{TetrisLegalizer, TetrisOutcome};
    pub use crate::well::{ClusterLegalizer, ClusterOutcome, TapCell};
}
