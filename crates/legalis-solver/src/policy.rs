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

//! Row-fit strategies plugged into [`crate::sweep::RowSweepLegalizer`].

use legalis_model::{block::Block, well::Orientation};

/// Decides which rows a block may start in and how it is oriented there.
pub trait RowFit {
    fn admits(&self, row: usize, block: &Block) -> bool;

    fn orientation(&self, row: usize, block: &Block) -> Orientation;
}

/// Every row fits every block; orientations are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnyRow;

impl RowFit for AnyRow {
    #[inline]
    fn admits(&self, _row: usize, _block: &Block) -> bool {
        true
    }

    #[inline]
    fn orientation(&self, _row: usize, block: &Block) -> Orientation {
        block.orientation()
    }
}

/// Rows alternate well polarity.
///
/// Row `0` has its p-well at the bottom iff `first_row_n`. A cell with an odd number of well
/// regions fits any row, flipped to match the row's polarity. A cell with an even number of
/// regions has a p-well band at the bottom in both orientations, so it only fits p-bottom
/// rows. Blocks without a well shape fit anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellRowParity {
    pub first_row_n: bool,
}

impl Default for WellRowParity {
    fn default() -> Self {
        Self { first_row_n: true }
    }
}

impl WellRowParity {
    #[inline]
    pub fn new(first_row_n: bool) -> Self {
        Self { first_row_n }
    }

    /// Whether `row` has its p-well at the bottom.
    #[inline]
    pub fn is_row_n(&self, row: usize) -> bool {
        (row % 2 == 0) == self.first_row_n
    }
}

impl RowFit for WellRowParity {
    fn admits(&self, row: usize, block: &Block) -> bool {
        match block.well() {
            Some(well) if well.region_count() % 2 == 0 => self.is_row_n(row),
            _ => true,
        }
    }

    fn orientation(&self, row: usize, block: &Block) -> Orientation {
        match block.well() {
            None => block.orientation(),
            Some(well) if well.region_count() % 2 == 0 => Orientation::N,
            Some(_) if self.is_row_n(row) => Orientation::N,
            Some(_) => Orientation::FS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalis_model::{
        id::BlockId,
        well::{WellRegion, WellShape},
    };

    fn single() -> Block {
        Block::movable(BlockId::new(0), 4, 10, 0.0, 0.0).with_well(WellShape::single(5, 5))
    }

    fn double() -> Block {
        Block::movable(BlockId::new(1), 4, 20, 0.0, 0.0)
            .with_well(WellShape::new(vec![WellRegion::new(5, 5); 2]))
    }

    #[test]
    fn single_height_cells_flip_with_the_row() {
        let p = WellRowParity::new(true);
        assert!(p.admits(0, &single()) && p.admits(1, &single()));
        assert_eq!(p.orientation(0, &single()), Orientation::N);
        assert_eq!(p.orientation(1, &single()), Orientation::FS);
        let q = WellRowParity::new(false);
        assert_eq!(q.orientation(0, &single()), Orientation::FS);
    }

    #[test]
    fn even_region_cells_need_p_bottom_rows() {
        let p = WellRowParity::new(true);
        assert!(p.admits(2, &double()));
        assert!(!p.admits(3, &double()));
        assert_eq!(p.orientation(2, &double()), Orientation::N);
    }

    #[test]
    fn plain_blocks_fit_everywhere() {
        let b = Block::movable(BlockId::new(0), 4, 10, 0.0, 0.0).with_orientation(Orientation::FS);
        assert!(WellRowParity::default().admits(1, &b));
        assert_eq!(WellRowParity::default().orientation(0, &b), Orientation::FS);
        assert_eq!(AnyRow.orientation(0, &b), Orientation::FS);
    }
}
