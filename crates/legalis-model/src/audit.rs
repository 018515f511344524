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

//! Post-legalization checks.
//!
//! [`audit`] reports every broken placement invariant instead of stopping at the first one,
//! so callers can log or count them.

use crate::id::BlockId;
use crate::placement::Placement;
use legalis_core::geometry::Rect;
use std::fmt::Display;

/// A broken placement invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// A relocatable block leaves the region.
    OutOfBounds(BlockId),
    /// Two blocks overlap with positive area.
    Overlap(BlockId, BlockId),
    /// A relocatable block is not on a row boundary.
    OffRow(BlockId),
    /// A relocatable block has a fractional coordinate.
    OffGrid(BlockId),
    /// An extra cell (such as an inserted well tap) leaves the region.
    ExtraOutOfBounds(usize),
    /// An extra cell overlaps a block.
    ExtraOverlap(usize, BlockId),
    /// Two extra cells overlap.
    ExtraPairOverlap(usize, usize),
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Violation::*;
        match self {
            OutOfBounds(id) => write!(f, "{} lies outside the region", id),
            Overlap(a, b) => write!(f, "{} overlaps {}", a, b),
            OffRow(id) => write!(f, "{} is not row aligned", id),
            OffGrid(id) => write!(f, "{} is not on the integer grid", id),
            ExtraOutOfBounds(i) => write!(f, "extra cell {} lies outside the region", i),
            ExtraOverlap(i, id) => write!(f, "extra cell {} overlaps {}", i, id),
            ExtraPairOverlap(i, j) => write!(f, "extra cells {} and {} overlap", i, j),
        }
    }
}

/// Which optional checks [`audit`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditOptions {
    /// Require `(y - bottom) % row_height == 0`. Off in well mode.
    pub check_rows: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self { check_rows: true }
    }
}

#[derive(Clone, Copy)]
enum Item {
    Block(BlockId),
    Extra(usize),
}

/// Checks bounds, grid and row alignment of relocatable blocks, and pairwise overlap of all
/// blocks. Overlaps between two obstacles are not reported.
pub fn audit(placement: &Placement, options: AuditOptions) -> Vec<Violation> {
    audit_with_extra(placement, options, &[])
}

/// Like [`audit`], additionally checking `extra` cells that are not part of the placement.
pub fn audit_with_extra(
    placement: &Placement,
    options: AuditOptions,
    extra: &[Rect],
) -> Vec<Violation> {
    let region = placement.region();
    let bounds = region.bounds();
    let mut violations = Vec::new();

    for block in placement.blocks().iter().filter(|b| b.is_relocatable()) {
        if block.x().fract() != 0.0 || block.y().fract() != 0.0 {
            violations.push(Violation::OffGrid(block.id()));
        }
        if !bounds.contains_rect(&block.footprint()) {
            violations.push(Violation::OutOfBounds(block.id()));
        }
        if options.check_rows && !region.is_row_aligned(block.ly()) {
            violations.push(Violation::OffRow(block.id()));
        }
    }
    for (i, cell) in extra.iter().enumerate() {
        if !bounds.contains_rect(cell) {
            violations.push(Violation::ExtraOutOfBounds(i));
        }
    }

    let mut items: Vec<(Rect, Item, bool)> = placement
        .blocks()
        .iter()
        .map(|b| (b.footprint(), Item::Block(b.id()), b.is_obstacle()))
        .chain(
            extra
                .iter()
                .enumerate()
                .map(|(i, r)| (*r, Item::Extra(i), false)),
        )
        .collect();
    items.sort_by_key(|(r, _, _)| r.lx());

    // Sweep in x; `active` holds items whose right edge lies beyond the sweep line.
    let mut active: Vec<usize> = Vec::new();
    for current in 0..items.len() {
        let (rect, item, obstacle) = items[current];
        active.retain(|&a| items[a].0.ux() > rect.lx());
        for &a in &active {
            let (other_rect, other_item, other_obstacle) = items[a];
            if (obstacle && other_obstacle) || !rect.overlaps(&other_rect) {
                continue;
            }
            violations.push(match (other_item, item) {
                (Item::Block(x), Item::Block(y)) => Violation::Overlap(x.min(y), x.max(y)),
                (Item::Extra(i), Item::Block(id)) | (Item::Block(id), Item::Extra(i)) => {
                    Violation::ExtraOverlap(i, id)
                }
                (Item::Extra(i), Item::Extra(j)) => Violation::ExtraPairOverlap(i.min(j), i.max(j)),
            });
        }
        active.push(current);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::placement::PlacementBuilder;
    use crate::region::PlacementRegion;

    fn placement(blocks: Vec<Block>) -> Placement {
        let region = PlacementRegion::new(0, 100, 0, 50, 10, 1).expect("valid region");
        let mut b = PlacementBuilder::new(region);
        for block in blocks {
            b.add_block(block).expect("valid block");
        }
        b.build()
    }

    fn id(i: usize) -> BlockId {
        BlockId::new(i)
    }

    #[test]
    fn legal_placement_has_no_violations() {
        let p = placement(vec![
            Block::movable(id(0), 10, 10, 0.0, 0.0),
            Block::movable(id(1), 10, 10, 10.0, 0.0),
            Block::fixed(id(2), 10, 20, 20, 0),
        ]);
        assert_eq!(audit(&p, AuditOptions::default()), vec![]);
    }

    #[test]
    fn reports_each_kind_of_violation() {
        let p = placement(vec![
            Block::movable(id(0), 10, 10, 0.0, 0.0),
            Block::movable(id(1), 10, 10, 5.0, 0.0),
            Block::movable(id(2), 10, 10, 95.0, 5.0),
            Block::movable(id(3), 10, 10, 40.5, 20.0),
        ]);
        let v = audit(&p, AuditOptions::default());
        assert!(v.contains(&Violation::Overlap(id(0), id(1))), "{:?}", v);
        assert!(v.contains(&Violation::OutOfBounds(id(2))), "{:?}", v);
        assert!(v.contains(&Violation::OffRow(id(2))), "{:?}", v);
        assert!(v.contains(&Violation::OffGrid(id(3))), "{:?}", v);
    }

    #[test]
    fn row_check_can_be_disabled() {
        let p = placement(vec![Block::movable(id(0), 10, 10, 0.0, 5.0)]);
        assert!(audit(&p, AuditOptions { check_rows: false }).is_empty());
    }

    #[test]
    fn obstacle_pairs_are_ignored() {
        let p = placement(vec![
            Block::fixed(id(0), 10, 10, 0, 0),
            Block::fixed(id(1), 10, 10, 5, 0),
        ]);
        assert!(audit(&p, AuditOptions::default()).is_empty());
    }

    #[test]
    fn extra_cells_are_checked_against_blocks() {
        let p = placement(vec![Block::movable(id(0), 10, 10, 0.0, 0.0)]);
        let taps = [Rect::new(5, 0, 2, 10), Rect::new(20, 0, 2, 10)];
        let v = audit_with_extra(&p, AuditOptions::default(), &taps);
        assert_eq!(v, vec![Violation::ExtraOverlap(0, id(0))]);
    }
}
