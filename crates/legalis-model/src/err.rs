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

use crate::id::BlockId;
use legalis_core::Coord;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DegenerateRegionError {
    left: Coord,
    right: Coord,
    bottom: Coord,
    top: Coord,
}

impl DegenerateRegionError {
    #[inline]
    pub fn new(left: Coord, right: Coord, bottom: Coord, top: Coord) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    #[inline]
    pub fn left(&self) -> Coord {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Coord {
        self.right
    }

    #[inline]
    pub fn bottom(&self) -> Coord {
        self.bottom
    }

    #[inline]
    pub fn top(&self) -> Coord {
        self.top
    }
}

impl Display for DegenerateRegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Region [{}, {}] x [{}, {}] has no area",
            self.left, self.right, self.bottom, self.top
        )
    }
}

impl std::error::Error for DegenerateRegionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidRowHeightError {
    row_height: Coord,
    region_height: Coord,
}

impl InvalidRowHeightError {
    #[inline]
    pub fn new(row_height: Coord, region_height: Coord) -> Self {
        Self {
            row_height,
            region_height,
        }
    }

    #[inline]
    pub fn row_height(&self) -> Coord {
        self.row_height
    }

    #[inline]
    pub fn region_height(&self) -> Coord {
        self.region_height
    }
}

impl Display for InvalidRowHeightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Row height {} does not fit a region of height {}",
            self.row_height, self.region_height
        )
    }
}

impl std::error::Error for InvalidRowHeightError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidMinBlockWidthError {
    min_block_width: Coord,
}

impl InvalidMinBlockWidthError {
    #[inline]
    pub fn new(min_block_width: Coord) -> Self {
        Self { min_block_width }
    }

    #[inline]
    pub fn min_block_width(&self) -> Coord {
        self.min_block_width
    }
}

impl Display for InvalidMinBlockWidthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Minimum block width must be positive, got {}",
            self.min_block_width
        )
    }
}

impl std::error::Error for InvalidMinBlockWidthError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionError {
    Degenerate(DegenerateRegionError),
    RowHeight(InvalidRowHeightError),
    MinBlockWidth(InvalidMinBlockWidthError),
}

impl Display for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RegionError::*;
        match self {
            Degenerate(e) => write!(f, "{}", e),
            RowHeight(e) => write!(f, "{}", e),
            MinBlockWidth(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegionError {}

impl From<DegenerateRegionError> for RegionError {
    fn from(err: DegenerateRegionError) -> Self {
        RegionError::Degenerate(err)
    }
}

impl From<InvalidRowHeightError> for RegionError {
    fn from(err: InvalidRowHeightError) -> Self {
        RegionError::RowHeight(err)
    }
}

impl From<InvalidMinBlockWidthError> for RegionError {
    fn from(err: InvalidMinBlockWidthError) -> Self {
        RegionError::MinBlockWidth(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonPositiveDimensionError {
    id: BlockId,
    width: Coord,
    height: Coord,
}

impl NonPositiveDimensionError {
    #[inline]
    pub fn new(id: BlockId, width: Coord, height: Coord) -> Self {
        Self { id, width, height }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> Coord {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.height
    }
}

impl Display for NonPositiveDimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Block {} has non-positive size {}x{}",
            self.id, self.width, self.height
        )
    }
}

impl std::error::Error for NonPositiveDimensionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WellHeightMismatchError {
    id: BlockId,
    block_height: Coord,
    well_height: Coord,
}

impl WellHeightMismatchError {
    #[inline]
    pub fn new(id: BlockId, block_height: Coord, well_height: Coord) -> Self {
        Self {
            id,
            block_height,
            well_height,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn block_height(&self) -> Coord {
        self.block_height
    }

    #[inline]
    pub fn well_height(&self) -> Coord {
        self.well_height
    }
}

impl Display for WellHeightMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Block {} is {} high but its well regions add up to {}",
            self.id, self.block_height, self.well_height
        )
    }
}

impl std::error::Error for WellHeightMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockIdMismatchError {
    expected: BlockId,
    found: BlockId,
}

impl BlockIdMismatchError {
    #[inline]
    pub fn new(expected: BlockId, found: BlockId) -> Self {
        Self { expected, found }
    }

    #[inline]
    pub fn expected(&self) -> BlockId {
        self.expected
    }

    #[inline]
    pub fn found(&self) -> BlockId {
        self.found
    }
}

impl Display for BlockIdMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected the next block to be {}, found {}",
            self.expected, self.found
        )
    }
}

impl std::error::Error for BlockIdMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonFinitePositionError {
    id: BlockId,
}

impl NonFinitePositionError {
    #[inline]
    pub fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }
}

impl Display for NonFinitePositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block {} has a non-finite position", self.id)
    }
}

impl std::error::Error for NonFinitePositionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementBuildError {
    NonPositiveDimension(NonPositiveDimensionError),
    WellHeightMismatch(WellHeightMismatchError),
    BlockIdMismatch(BlockIdMismatchError),
    NonFinitePosition(NonFinitePositionError),
}

impl Display for PlacementBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PlacementBuildError::*;
        match self {
            NonPositiveDimension(e) => write!(f, "{}", e),
            WellHeightMismatch(e) => write!(f, "{}", e),
            BlockIdMismatch(e) => write!(f, "{}", e),
            NonFinitePosition(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlacementBuildError {}

impl From<NonPositiveDimensionError> for PlacementBuildError {
    fn from(err: NonPositiveDimensionError) -> Self {
        PlacementBuildError::NonPositiveDimension(err)
    }
}

impl From<WellHeightMismatchError> for PlacementBuildError {
    fn from(err: WellHeightMismatchError) -> Self {
        PlacementBuildError::WellHeightMismatch(err)
    }
}

impl From<BlockIdMismatchError> for PlacementBuildError {
    fn from(err: BlockIdMismatchError) -> Self {
        PlacementBuildError::BlockIdMismatch(err)
    }
}

impl From<NonFinitePositionError> for PlacementBuildError {
    fn from(err: NonFinitePositionError) -> Self {
        PlacementBuildError::NonFinitePosition(err)
    }
}
