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

//! # Placement Model (`legalis-model`)
//!
//! The data a legalizer works on, built on the primitives of `legalis-core`.
//!
//! ## Key Data Structures
//!
//! - **`Block`**: a rectangular cell or macro with a tentative lower-left position, movable and
//!   fixed flags, an orientation and an optional **`WellShape`** for well-aware legalization.
//!
//! - **`PlacementRegion`**: the placement bounds, the row height and the minimum block width.
//!   Rows are numbered from the bottom of the region.
//!
//! - **`Placement`**: a region plus its blocks, assembled through **`PlacementBuilder`**, which
//!   rejects zero-sized blocks, non-finite positions and inconsistent well shapes.
//!
//! ## Checking Results
//!
//! [`audit::audit`] lists every out-of-bounds, overlapping, off-row or off-grid block, and
//! [`stats::DisplacementStats`] measures how far blocks moved between two snapshots.
//!
//! ## Instances
//!
//! The [`generator`] module produces seeded random placements for tests, benches and the
//! demo binary.

pub mod audit;
pub mod block;
pub mod err;
pub mod generator;
pub mod id;
pub mod placement;
pub mod region;
pub mod stats;
pub mod well;

pub mod prelude {
    pub use crate::audit::{AuditOptions, Violation, audit, audit_with_extra};
    pub use crate::block::Block;
    pub use crate::err::{PlacementBuildError, RegionError};
    pub use crate::generator::{
        InstanceGenConfig, InstanceGenConfigBuilder, InstanceGenerator, WellGenSpec,
    };
    pub use crate::id::BlockId;
    pub use crate::placement::{Placement, PlacementBuilder};
    pub use crate::region::PlacementRegion;
    pub use crate::stats::DisplacementStats;
    pub use crate::well::{Orientation, WellRegion, WellShape};
}
