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

use crate::freespace::AllocationError;
use legalis_core::Coord;
use legalis_model::id::BlockId;
use std::fmt::Display;

/// Failure of a [`crate::grid::GridSpace`] lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpaceError {
    /// No row offset in the whole grid has room for the footprint.
    Infeasible { width: Coord, height: Coord },
    Allocation(AllocationError<Coord>),
}

impl From<AllocationError<Coord>> for GridSpaceError {
    fn from(value: AllocationError<Coord>) -> Self {
        GridSpaceError::Allocation(value)
    }
}

impl Display for GridSpaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridSpaceError::Infeasible { width, height } => {
                write!(f, "no free footprint of {}x{} anywhere in the grid", width, height)
            }
            GridSpaceError::Allocation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GridSpaceError {}

/// The optimizer's variables do not fit between its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanOverflowError {
    required: Coord,
    available: Coord,
}

impl SpanOverflowError {
    #[inline]
    pub fn new(required: Coord, available: Coord) -> Self {
        Self {
            required,
            available,
        }
    }

    #[inline]
    pub fn required(&self) -> Coord {
        self.required
    }

    #[inline]
    pub fn available(&self) -> Coord {
        self.available
    }
}

impl Display for SpanOverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "variables need a span of {} but only {} is available",
            self.required, self.available
        )
    }
}

impl std::error::Error for SpanOverflowError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonPositiveWeightError {
    index: usize,
    weight: f64,
}

impl NonPositiveWeightError {
    #[inline]
    pub fn new(index: usize, weight: f64) -> Self {
        Self { index, weight }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Display for NonPositiveWeightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "variable {} has weight {}, weights must be positive and finite",
            self.index, self.weight
        )
    }
}

impl std::error::Error for NonPositiveWeightError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptimizerError {
    Overflow(SpanOverflowError),
    NonPositiveWeight(NonPositiveWeightError),
}

impl From<SpanOverflowError> for OptimizerError {
    fn from(value: SpanOverflowError) -> Self {
        OptimizerError::Overflow(value)
    }
}

impl From<NonPositiveWeightError> for OptimizerError {
    fn from(value: NonPositiveWeightError) -> Self {
        OptimizerError::NonPositiveWeight(value)
    }
}

impl Display for OptimizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use OptimizerError::*;
        match self {
            Overflow(e) => write!(f, "{}", e),
            NonPositiveWeight(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OptimizerError {}

/// A movable block reached the well legalizer without a well shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingWellShapeError {
    id: BlockId,
}

impl MissingWellShapeError {
    #[inline]
    pub fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }
}

impl Display for MissingWellShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is movable but has no well shape", self.id)
    }
}

impl std::error::Error for MissingWellShapeError {}

/// Contract breaches that abort a legalization call.
///
/// Infeasible blocks and non-convergence are not errors; they are reported through the
/// outcome of each legalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegalizeError {
    MissingWellShape(MissingWellShapeError),
    Allocation(AllocationError<Coord>),
    Optimizer(OptimizerError),
}

impl From<MissingWellShapeError> for LegalizeError {
    fn from(value: MissingWellShapeError) -> Self {
        LegalizeError::MissingWellShape(value)
    }
}

impl From<AllocationError<Coord>> for LegalizeError {
    fn from(value: AllocationError<Coord>) -> Self {
        LegalizeError::Allocation(value)
    }
}

impl From<OptimizerError> for LegalizeError {
    fn from(value: OptimizerError) -> Self {
        LegalizeError::Optimizer(value)
    }
}

impl Display for LegalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LegalizeError::*;
        match self {
            MissingWellShape(e) => write!(f, "{}", e),
            Allocation(e) => write!(f, "{}", e),
            Optimizer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LegalizeError {}
