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

use crate::block::Block;
use crate::err::{
    BlockIdMismatchError, NonFinitePositionError, NonPositiveDimensionError, PlacementBuildError,
    WellHeightMismatchError,
};
use crate::id::BlockId;
use crate::region::PlacementRegion;

/// A legalization instance: the region plus every block in it.
///
/// Block ids equal their index in [`Placement::blocks`]. Legalizers take the placement by
/// mutable reference and only ever change block positions and orientations.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    region: PlacementRegion,
    blocks: Vec<Block>,
}

impl Placement {
    /// Assembles a placement whose blocks are already known to be valid.
    pub(crate) fn from_parts(region: PlacementRegion, blocks: Vec<Block>) -> Self {
        debug_assert!(blocks.iter().enumerate().all(|(i, b)| b.id().index() == i));
        Self { region, blocks }
    }

    #[inline]
    pub fn region(&self) -> &PlacementRegion {
        &self.region
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    #[inline]
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    /// Splits the placement into its region and blocks so both can be borrowed at once.
    #[inline]
    pub fn parts_mut(&mut self) -> (&PlacementRegion, &mut [Block]) {
        (&self.region, &mut self.blocks)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Ids of all blocks legalizers are allowed to move.
    pub fn relocatable_ids(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.is_relocatable())
            .map(Block::id)
            .collect()
    }

    #[inline]
    pub fn relocatable_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_relocatable()).count()
    }
}

/// Incrementally validates blocks into a [`Placement`].
#[derive(Debug, Clone)]
pub struct PlacementBuilder {
    region: PlacementRegion,
    blocks: Vec<Block>,
}

impl PlacementBuilder {
    #[inline]
    pub fn new(region: PlacementRegion) -> Self {
        Self {
            region,
            blocks: Vec::new(),
        }
    }

    #[inline]
    pub fn region(&mut self, region: PlacementRegion) -> &mut Self {
        self.region = region;
        self
    }

    /// The id the next added block must carry.
    #[inline]
    pub fn next_id(&self) -> BlockId {
        BlockId::new(self.blocks.len())
    }

    pub fn add_block(&mut self, block: Block) -> Result<&mut Self, PlacementBuildError> {
        let expected = self.next_id();
        if block.id() != expected {
            return Err(BlockIdMismatchError::new(expected, block.id()).into());
        }
        if block.width() <= 0 || block.height() <= 0 {
            return Err(
                NonPositiveDimensionError::new(block.id(), block.width(), block.height()).into(),
            );
        }
        if !block.x().is_finite() || !block.y().is_finite() {
            return Err(NonFinitePositionError::new(block.id()).into());
        }
        if let Some(well) = block.well()
            && well.height() != block.height()
        {
            return Err(
                WellHeightMismatchError::new(block.id(), block.height(), well.height()).into(),
            );
        }
        self.blocks.push(block);
        Ok(self)
    }

    #[must_use]
    #[inline]
    pub fn build(&self) -> Placement {
        Placement {
            region: self.region,
            blocks: self.blocks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::WellShape;

    fn region() -> PlacementRegion {
        PlacementRegion::new(0, 100, 0, 100, 10, 1).expect("valid region")
    }

    #[test]
    fn builder_requires_sequential_ids() {
        let mut b = PlacementBuilder::new(region());
        let err = b
            .add_block(Block::movable(BlockId::new(3), 2, 10, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, PlacementBuildError::BlockIdMismatch(_)));
    }

    #[test]
    fn builder_rejects_zero_sized_blocks() {
        let mut b = PlacementBuilder::new(region());
        let err = b
            .add_block(Block::movable(BlockId::new(0), 0, 10, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, PlacementBuildError::NonPositiveDimension(_)));
    }

    #[test]
    fn builder_rejects_non_finite_positions() {
        let mut b = PlacementBuilder::new(region());
        let err = b
            .add_block(Block::movable(BlockId::new(0), 2, 10, f64::NAN, 0.0))
            .unwrap_err();
        assert!(matches!(err, PlacementBuildError::NonFinitePosition(_)));
    }

    #[test]
    fn builder_checks_well_height() {
        let mut b = PlacementBuilder::new(region());
        let block =
            Block::movable(BlockId::new(0), 2, 10, 0.0, 0.0).with_well(WellShape::single(5, 4));
        let err = b.add_block(block).unwrap_err();
        assert!(matches!(err, PlacementBuildError::WellHeightMismatch(_)));
    }

    #[test]
    fn build_ok_when_valid() {
        let mut b = PlacementBuilder::new(region());
        b.add_block(Block::movable(BlockId::new(0), 2, 10, 1.5, 0.0))
            .expect("movable ok")
            .add_block(Block::fixed(BlockId::new(1), 20, 20, 50, 50))
            .expect("fixed ok");
        let p = b.build();
        assert_eq!(p.len(), 2);
        assert_eq!(p.relocatable_ids(), vec![BlockId::new(0)]);
        assert_eq!(p.block(BlockId::new(1)).lx(), 50);
    }
}
