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

//! Axis-aligned rectangles in grid units.

use crate::Coord;
use crate::primitives::Interval;
use std::fmt;

/// An axis-aligned rectangle given by its lower-left corner and its size.
///
/// Both spans are half-open, so two rectangles sharing an edge do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    lx: Coord,
    ly: Coord,
    width: Coord,
    height: Coord,
}

impl Rect {
    /// # Panics
    ///
    /// Panics if `width` or `height` is negative.
    #[inline]
    pub fn new(lx: Coord, ly: Coord, width: Coord, height: Coord) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "Rect::new: negative size {}x{}",
            width,
            height
        );
        Self {
            lx,
            ly,
            width,
            height,
        }
    }

    #[inline]
    pub fn lx(&self) -> Coord {
        self.lx
    }

    #[inline]
    pub fn ly(&self) -> Coord {
        self.ly
    }

    #[inline]
    pub fn ux(&self) -> Coord {
        self.lx + self.width
    }

    #[inline]
    pub fn uy(&self) -> Coord {
        self.ly + self.height
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
    pub fn x_span(&self) -> Interval<Coord> {
        Interval::new(self.lx, self.ux())
    }

    #[inline]
    pub fn y_span(&self) -> Interval<Coord> {
        Interval::new(self.ly, self.uy())
    }

    /// Positive-area overlap. Rectangles that only share an edge or a corner do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x_span().overlaps(&other.x_span()) && self.y_span().overlaps(&other.y_span())
    }

    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x_span().contains_interval(&other.x_span())
            && self.y_span().contains_interval(&other.y_span())
    }

    /// The overlapping part, if it has positive area.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let xs = self.x_span().intersection(&other.x_span())?;
        let ys = self.y_span().intersection(&other.y_span())?;
        Some(Rect::new(xs.start(), ys.start(), xs.length(), ys.length()))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})..({}, {})",
            self.lx,
            self.ly,
            self.ux(),
            self.uy()
        )
    }
}
