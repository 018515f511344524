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

//! Primitive value types shared by the legalis crates.
//!
//! Coordinates are integer grid units. The [`primitives::Interval`] type carries the
//! pairwise interval algebra used by the row free-space tracker, and
//! [`geometry::Rect`] describes block footprints.

use num_traits::{PrimInt, Signed, Zero};
use std::fmt::{Debug, Display};

pub mod geometry;
pub mod primitives;

/// Numeric bound for grid coordinates.
pub trait GridVariable: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}
impl<T> GridVariable for T where T: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}

/// The concrete coordinate type used for placement grids.
pub type Coord = i64;
