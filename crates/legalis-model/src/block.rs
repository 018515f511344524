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
use crate::well::{Orientation, WellShape};
use legalis_core::Coord;
use legalis_core::geometry::Rect;

/// A rectangular cell or macro.
///
/// Positions are lower-left corners. Before legalization they are arbitrary reals produced by
/// a global placer; legalizers only ever write integer grid coordinates back.
///
/// A block is relocated iff it is movable and not fixed. Every other block is treated as an
/// obstacle and never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    width: Coord,
    height: Coord,
    x: f64,
    y: f64,
    movable: bool,
    fixed: bool,
    orientation: Orientation,
    well: Option<WellShape>,
}

impl Block {
    #[inline]
    pub fn new(
        id: BlockId,
        width: Coord,
        height: Coord,
        x: f64,
        y: f64,
        movable: bool,
        fixed: bool,
    ) -> Self {
        Self {
            id,
            width,
            height,
            x,
            y,
            movable,
            fixed,
            orientation: Orientation::N,
            well: None,
        }
    }

    /// A movable cell at a tentative position.
    #[inline]
    pub fn movable(id: BlockId, width: Coord, height: Coord, x: f64, y: f64) -> Self {
        Self::new(id, width, height, x, y, true, false)
    }

    /// A fixed obstacle.
    #[inline]
    pub fn fixed(id: BlockId, width: Coord, height: Coord, x: Coord, y: Coord) -> Self {
        Self::new(id, width, height, x as f64, y as f64, false, true)
    }

    #[inline]
    pub fn with_well(mut self, well: WellShape) -> Self {
        self.well = Some(well);
        self
    }

    #[inline]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
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

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn ux(&self) -> f64 {
        self.x + self.width as f64
    }

    #[inline]
    pub fn uy(&self) -> f64 {
        self.y + self.height as f64
    }

    /// Lower-left x rounded to the grid.
    #[inline]
    pub fn lx(&self) -> Coord {
        self.x.round() as Coord
    }

    /// Lower-left y rounded to the grid.
    #[inline]
    pub fn ly(&self) -> Coord {
        self.y.round() as Coord
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        self.movable
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Whether legalizers may move this block.
    #[inline]
    pub fn is_relocatable(&self) -> bool {
        self.movable && !self.fixed
    }

    #[inline]
    pub fn is_obstacle(&self) -> bool {
        !self.is_relocatable()
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn well(&self) -> Option<&WellShape> {
        self.well.as_ref()
    }

    /// The grid-rounded footprint.
    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.lx(), self.ly(), self.width, self.height)
    }

    /// Moves the block to an integer grid location.
    #[inline]
    pub fn set_location(&mut self, x: Coord, y: Coord) {
        self.x = x as f64;
        self.y = y as f64;
    }

    #[inline]
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    #[inline]
    pub fn area(&self) -> Coord {
        self.width * self.height
    }
}
