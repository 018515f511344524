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

//! Well geometry of standard cells.
//!
//! A cell is split vertically into one or more well regions. Each region carries a p-well
//! and an n-well band. In orientation [`Orientation::N`] region `0` sits at the bottom of the
//! cell with its p-well below its n-well, and the polarity alternates with every region above,
//! so neighbouring regions share a band of the same well type.

use legalis_core::Coord;
use std::fmt::Display;

/// Vertical orientation of a placed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// As drawn: region 0 at the bottom, p-well under n-well.
    #[default]
    N,
    /// Mirrored about the horizontal axis.
    FS,
}

impl Orientation {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Orientation::N => Orientation::FS,
            Orientation::FS => Orientation::N,
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::N => write!(f, "N"),
            Orientation::FS => write!(f, "FS"),
        }
    }
}

/// One p-well/n-well pair of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WellRegion {
    p_height: Coord,
    n_height: Coord,
}

impl WellRegion {
    #[inline]
    pub const fn new(p_height: Coord, n_height: Coord) -> Self {
        Self { p_height, n_height }
    }

    #[inline]
    pub const fn p_height(&self) -> Coord {
        self.p_height
    }

    #[inline]
    pub const fn n_height(&self) -> Coord {
        self.n_height
    }

    #[inline]
    pub const fn height(&self) -> Coord {
        self.p_height + self.n_height
    }

    /// Height of the well band at the bottom of the region when the p-well is (or is not)
    /// the lower band.
    #[inline]
    pub const fn bottom_height(&self, p_at_bottom: bool) -> Coord {
        if p_at_bottom {
            self.p_height
        } else {
            self.n_height
        }
    }

    #[inline]
    pub const fn top_height(&self, p_at_bottom: bool) -> Coord {
        if p_at_bottom {
            self.n_height
        } else {
            self.p_height
        }
    }
}

/// The stacked well regions of a cell, bottom to top in orientation `N`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WellShape {
    regions: Vec<WellRegion>,
}

impl WellShape {
    /// # Panics
    ///
    /// Panics if `regions` is empty.
    pub fn new(regions: Vec<WellRegion>) -> Self {
        assert!(!regions.is_empty(), "WellShape::new: a cell needs at least one well region");
        Self { regions }
    }

    /// A conventional single-height cell.
    #[inline]
    pub fn single(p_height: Coord, n_height: Coord) -> Self {
        Self {
            regions: vec![WellRegion::new(p_height, n_height)],
        }
    }

    #[inline]
    pub fn regions(&self) -> &[WellRegion] {
        &self.regions
    }

    #[inline]
    pub fn region(&self, index: usize) -> WellRegion {
        self.regions[index]
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_multi_region(&self) -> bool {
        self.regions.len() > 1
    }

    /// Total height of all regions.
    #[inline]
    pub fn height(&self) -> Coord {
        self.regions.iter().map(WellRegion::height).sum()
    }

    /// Whether region `index` has its p-well at the bottom in orientation `N`.
    #[inline]
    pub fn is_p_bottom(&self, index: usize) -> bool {
        index % 2 == 0
    }

    /// Offset of region `index`'s lower edge from the cell's lower edge in orientation `N`.
    #[inline]
    pub fn region_offset(&self, index: usize) -> Coord {
        self.regions[..index].iter().map(WellRegion::height).sum()
    }

    /// Offset of the lowest p/n boundary from the cell's lower edge.
    pub fn pn_boundary_offset(&self, orientation: Orientation) -> Coord {
        match orientation {
            Orientation::N => self.regions[0].bottom_height(true),
            Orientation::FS => {
                // The top region ends up at the bottom, mirrored.
                let last = self.regions.len() - 1;
                self.regions[last].top_height(self.is_p_bottom(last))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_region_boundary_depends_on_orientation() {
        let shape = WellShape::single(6, 4);
        assert_eq!(shape.height(), 10);
        assert_eq!(shape.pn_boundary_offset(Orientation::N), 6);
        assert_eq!(shape.pn_boundary_offset(Orientation::FS), 4);
    }

    #[test]
    fn multi_region_polarity_alternates() {
        let shape = WellShape::new(vec![WellRegion::new(6, 4), WellRegion::new(5, 3)]);
        assert!(shape.is_multi_region());
        assert!(shape.is_p_bottom(0));
        assert!(!shape.is_p_bottom(1));
        assert_eq!(shape.region_offset(1), 10);
        assert_eq!(shape.height(), 18);
        // Region 1 is n-bottom, so its top band is the p-well.
        assert_eq!(shape.pn_boundary_offset(Orientation::FS), 5);
    }

    #[test]
    #[should_panic(expected = "at least one well region")]
    fn empty_shape_is_rejected() {
        let _ = WellShape::new(Vec::new());
    }

    #[test]
    fn orientation_flip_is_an_involution() {
        assert_eq!(Orientation::N.flipped(), Orientation::FS);
        assert_eq!(Orientation::N.flipped().flipped(), Orientation::N);
        assert_eq!(Orientation::FS.to_string(), "FS");
    }
}
