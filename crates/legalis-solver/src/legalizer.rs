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

use crate::err::LegalizeError;
use crate::policy::RowFit;
use crate::sweep::{RowSweepLegalizer, SweepOutcome};
use crate::tetris::{TetrisLegalizer, TetrisOutcome};
use crate::well::{ClusterLegalizer, ClusterOutcome};
use legalis_model::placement::Placement;

/// Common entry point of all legalizers.
///
/// `legalize` moves relocatable blocks of the placement in place. Blocks the legalizer could
/// not place legally are reported through the outcome, not through `Err`.
pub trait Legalizer {
    type Outcome;
    type Error;

    fn legalize(&mut self, placement: &mut Placement) -> Result<Self::Outcome, Self::Error>;
}

impl Legalizer for TetrisLegalizer {
    type Outcome = TetrisOutcome;
    type Error = LegalizeError;

    #[inline]
    fn legalize(&mut self, placement: &mut Placement) -> Result<Self::Outcome, Self::Error> {
        self.run(placement)
    }
}

impl<P: RowFit> Legalizer for RowSweepLegalizer<P> {
    type Outcome = SweepOutcome;
    type Error = LegalizeError;

    #[inline]
    fn legalize(&mut self, placement: &mut Placement) -> Result<Self::Outcome, Self::Error> {
        self.run(placement)
    }
}

impl Legalizer for ClusterLegalizer {
    type Outcome = ClusterOutcome;
    type Error = LegalizeError;

    #[inline]
    fn legalize(&mut self, placement: &mut Placement) -> Result<Self::Outcome, Self::Error> {
        self.run(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalis_model::{
        audit::{AuditOptions, audit},
        block::Block,
        id::BlockId,
        placement::PlacementBuilder,
        region::PlacementRegion,
        well::WellShape,
    };

    fn crowded() -> Placement {
        let region = PlacementRegion::new(0, 60, 0, 30, 10, 1).expect("valid region");
        let mut b = PlacementBuilder::new(region);
        for i in 0..5 {
            let block = Block::movable(BlockId::new(i), 10, 10, 20.0 + i as f64, 10.0)
                .with_well(WellShape::single(5, 5));
            b.add_block(block).expect("valid block");
        }
        b.build()
    }

    fn legal_after<L: Legalizer<Error = LegalizeError>>(mut legalizer: L) -> bool {
        let mut p = crowded();
        legalizer.legalize(&mut p).expect("no contract breach");
        audit(&p, AuditOptions { check_rows: false }).is_empty()
    }

    #[test]
    fn every_legalizer_resolves_a_crowded_row() {
        assert!(legal_after(TetrisLegalizer::default()));
        assert!(legal_after(RowSweepLegalizer::default()));
        assert!(legal_after(ClusterLegalizer::default()));
    }
}
