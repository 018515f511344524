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

//! Clusters: horizontal well bands spanning a stripe, and the clustering of blocks into them.
//!
//! A cluster owns a p-well band and an n-well band. In orientation `N` the p-well is the lower
//! band. Every member is placed so that its own p/n boundary lies on the cluster's boundary,
//! which keeps the wells of horizontally adjacent members continuous.
//!
//! A cell with several well regions sits in a stack of clusters, one per region. Stacked
//! clusters are pinned: their bands and orientation are dictated by the cell.

use super::stripe::Stripe;
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{
    block::Block,
    id::BlockId,
    well::{Orientation, WellRegion, WellShape},
};
use std::ops::Range;
use tracing::debug;

/// One well region of a block sitting in a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    pub id: BlockId,
    pub region: usize,
}

/// Offset of the p/n boundary of region `region` from the lower edge of a cell in
/// `orientation`.
pub fn pn_offset(well: &WellShape, region: usize, orientation: Orientation) -> Coord {
    let r = well.region(region);
    let p_bottom = well.is_p_bottom(region);
    match orientation {
        Orientation::N => well.region_offset(region) + r.bottom_height(p_bottom),
        Orientation::FS => {
            well.height() - well.region_offset(region) - r.height() + r.top_height(p_bottom)
        }
    }
}

/// Orientation a cell needs so that region `region` matches a cluster in `cluster`.
#[inline]
pub fn member_orientation(well: &WellShape, region: usize, cluster: Orientation) -> Orientation {
    if well.is_p_bottom(region) {
        cluster
    } else {
        cluster.flipped()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    x_span: Interval<Coord>,
    ly: Coord,
    p_height: Coord,
    n_height: Coord,
    orientation: Orientation,
    pinned: bool,
    used_width: Coord,
    members: Vec<Member>,
}

impl Cluster {
    /// An empty cluster whose bands grow with its members.
    #[inline]
    pub fn new(x_span: Interval<Coord>, ly: Coord) -> Self {
        Self {
            x_span,
            ly,
            p_height: 0,
            n_height: 0,
            orientation: Orientation::N,
            pinned: false,
            used_width: 0,
            members: Vec::new(),
        }
    }

    /// A cluster with fixed bands and orientation.
    #[inline]
    pub fn pinned(
        x_span: Interval<Coord>,
        ly: Coord,
        region: WellRegion,
        orientation: Orientation,
    ) -> Self {
        Self {
            p_height: region.p_height(),
            n_height: region.n_height(),
            orientation,
            pinned: true,
            ..Self::new(x_span, ly)
        }
    }

    #[inline]
    pub fn x_span(&self) -> Interval<Coord> {
        self.x_span
    }

    #[inline]
    pub fn ly(&self) -> Coord {
        self.ly
    }

    #[inline]
    pub fn uy(&self) -> Coord {
        self.ly + self.height()
    }

    #[inline]
    pub fn height(&self) -> Coord {
        self.p_height + self.n_height
    }

    #[inline]
    pub fn p_height(&self) -> Coord {
        self.p_height
    }

    #[inline]
    pub fn n_height(&self) -> Coord {
        self.n_height
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    #[inline]
    pub fn used_width(&self) -> Coord {
        self.used_width
    }

    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Height of the lower band.
    #[inline]
    pub fn bottom_band(&self) -> Coord {
        match self.orientation {
            Orientation::N => self.p_height,
            Orientation::FS => self.n_height,
        }
    }

    /// The y of the p/n boundary.
    #[inline]
    pub fn pn_edge(&self) -> Coord {
        self.ly + self.bottom_band()
    }

    #[inline]
    pub fn set_ly(&mut self, ly: Coord) {
        self.ly = ly;
    }

    /// Sets the orientation before any member has been placed.
    #[inline]
    pub fn set_orientation(&mut self, orientation: Orientation) {
        debug_assert!(!self.pinned || orientation == self.orientation);
        self.orientation = orientation;
    }

    /// Whether a region with these bands can join without changing a pinned cluster.
    #[inline]
    pub fn fits_bands(&self, region: WellRegion) -> bool {
        !self.pinned
            || (region.p_height() <= self.p_height && region.n_height() <= self.n_height)
    }

    pub fn push(&mut self, member: Member, width: Coord, region: WellRegion) {
        debug_assert!(self.fits_bands(region));
        self.used_width += width;
        if !self.pinned {
            self.p_height = self.p_height.max(region.p_height());
            self.n_height = self.n_height.max(region.n_height());
        }
        self.members.push(member);
    }

    /// The lower-left y of a member block in this cluster.
    #[inline]
    pub fn member_y(&self, well: &WellShape, region: usize) -> Coord {
        let orientation = member_orientation(well, region, self.orientation);
        self.pn_edge() - pn_offset(well, region, orientation)
    }

    /// Moves every single-region member onto the cluster's p/n boundary and orients it.
    ///
    /// Members with several regions are placed through their region `0` only.
    pub fn place_members(&self, blocks: &mut [Block]) {
        for m in self.members.iter().filter(|m| m.region == 0) {
            let block = &mut blocks[m.id.index()];
            let Some(well) = block.well() else {
                continue;
            };
            let y = self.member_y(well, 0);
            let orientation = member_orientation(well, 0, self.orientation);
            let x = block.lx();
            block.set_location(x, y);
            block.set_orientation(orientation);
        }
    }

    /// Moves a placed cluster by `dy` together with the members it placed.
    pub fn shift(&mut self, dy: Coord, blocks: &mut [Block]) {
        self.ly += dy;
        for m in self.members.iter().filter(|m| m.region == 0) {
            let block = &mut blocks[m.id.index()];
            let (x, y) = (block.lx(), block.ly() + dy);
            block.set_location(x, y);
        }
    }

    /// Flips a placed cluster upside down.
    ///
    /// Members are reflected about the cluster's horizontal midline, which puts every member
    /// back onto the (moved) p/n boundary without another legalization.
    pub fn flip(&mut self, blocks: &mut [Block]) {
        debug_assert!(!self.pinned, "pinned clusters keep their orientation");
        let mirror = 2 * self.ly + self.height();
        for m in &self.members {
            let block = &mut blocks[m.id.index()];
            let (x, y) = (block.lx(), mirror - block.ly() - block.height());
            block.set_location(x, y);
            block.set_orientation(block.orientation().flipped());
        }
        self.orientation = self.orientation.flipped();
    }
}

/// Consecutive clusters placed as one vertical unit: a single cluster, or the stack of a
/// multi-region cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub clusters: Range<usize>,
    /// Well shape shared by every cell of a stack.
    pub shape: Option<WellShape>,
}

impl Unit {
    #[inline]
    pub fn is_stack(&self) -> bool {
        self.shape.is_some()
    }
}

/// The clusters of one stripe, grouped into units ordered bottom to top.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layering {
    pub clusters: Vec<Cluster>,
    pub units: Vec<Unit>,
}

impl Layering {
    pub fn unit_height(&self, unit: &Unit) -> Coord {
        self.clusters[unit.clusters.clone()]
            .iter()
            .map(Cluster::height)
            .sum()
    }

    pub fn total_height(&self) -> Coord {
        self.units.iter().map(|u| self.unit_height(u)).sum()
    }

    /// Height the units need when every stack may have to keep `spacing` to a neighbour.
    pub fn demand(&self, spacing: Coord) -> Coord {
        let stacks = self.units.iter().filter(|u| u.is_stack()).count() as Coord;
        self.total_height() + spacing * stacks
    }

    /// Lays the clusters of `unit` out contiguously from `ly`.
    pub fn set_unit_ly(&mut self, unit: usize, ly: Coord) {
        let mut cursor = ly;
        for c in &mut self.clusters[self.units[unit].clusters.clone()] {
            c.set_ly(cursor);
            cursor += c.height();
        }
    }

    /// Moves every cluster of a placed unit by `dy`.
    pub fn shift_unit(&mut self, unit: usize, dy: Coord, blocks: &mut [Block]) {
        for c in &mut self.clusters[self.units[unit].clusters.clone()] {
            c.shift(dy, blocks);
        }
    }

    /// Lower edge of the lowest cluster of `unit`.
    #[inline]
    pub fn unit_ly(&self, unit: usize) -> Coord {
        self.clusters[self.units[unit].clusters.start].ly()
    }

    /// Upper edge of the highest cluster of `unit`.
    #[inline]
    pub fn unit_uy(&self, unit: usize) -> Coord {
        self.clusters[self.units[unit].clusters.end - 1].uy()
    }

    pub fn member_count(&self, unit: &Unit) -> usize {
        self.clusters[unit.clusters.clone()]
            .iter()
            .map(|c| c.members().len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Up,
    Down,
}

/// Which clusters a block may join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Packing {
    /// Only the front unit, when the block reaches into it.
    Loose,
    /// Any cluster with room, nearest first. Multi-region cells are clustered first so that
    /// singles fill their stacks.
    Compact,
}

/// Builds the layering of a stripe greedily from one end.
struct Clustering<'a> {
    stripe: &'a Stripe,
    blocks: &'a [Block],
    /// Width kept free in every cluster for well taps.
    tap_reserve: Coord,
    growth: Growth,
    packing: Packing,
    contour: Coord,
    out: Layering,
}

impl<'a> Clustering<'a> {
    fn new(
        stripe: &'a Stripe,
        blocks: &'a [Block],
        tap_reserve: Coord,
        growth: Growth,
        packing: Packing,
    ) -> Self {
        let contour = match growth {
            Growth::Up => stripe.y_span().start(),
            Growth::Down => stripe.y_span().end(),
        };
        Self {
            stripe,
            blocks,
            tap_reserve,
            growth,
            packing,
            contour,
            out: Layering::default(),
        }
    }

    fn has_room(&self, cluster: &Cluster, width: Coord) -> bool {
        cluster.used_width() + width + self.tap_reserve <= self.stripe.width()
    }

    /// Whether `block` reaches into the band of the most recent unit.
    fn overlaps_front(&self, block: &Block) -> bool {
        !self.out.units.is_empty()
            && match self.growth {
                Growth::Up => block.ly() < self.contour,
                Growth::Down => block.ly() + block.height() > self.contour,
            }
    }

    fn refresh_contour(&mut self) {
        let Some(unit) = self.out.units.last() else {
            return;
        };
        let clusters = &self.out.clusters[unit.clusters.clone()];
        self.contour = match self.growth {
            Growth::Up => clusters.last().map_or(self.contour, Cluster::uy),
            Growth::Down => clusters.first().map_or(self.contour, Cluster::ly),
        };
    }

    /// Adds a region to the front cluster, keeping the far edge of the stripe fixed when
    /// growing downwards.
    fn join(&mut self, cluster: usize, member: Member, width: Coord, region: WellRegion) {
        let c = &mut self.out.clusters[cluster];
        let uy = c.uy();
        c.push(member, width, region);
        if self.growth == Growth::Down && !c.is_pinned() {
            let ly = uy - c.height();
            c.set_ly(ly);
        }
    }

    /// The cluster nearest to `block` that has room for it and accepts `region`.
    fn nearest_with_room(&self, block: &Block, region: WellRegion) -> Option<usize> {
        self.out
            .clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| self.has_room(c, block.width()) && c.fits_bands(region))
            .min_by_key(|(i, c)| ((c.ly() - block.ly()).abs(), *i))
            .map(|(i, _)| i)
    }

    fn append_single(&mut self, block: &Block, well: &WellShape) {
        let member = Member {
            id: block.id(),
            region: 0,
        };
        let region = well.region(0);
        if self.packing == Packing::Compact
            && let Some(index) = self.nearest_with_room(block, region)
        {
            self.join(index, member, block.width(), region);
            self.refresh_contour();
            return;
        }
        if self.overlaps_front(block)
            && let Some(unit) = self.out.units.last()
        {
            let front = match self.growth {
                Growth::Up => unit.clusters.end - 1,
                Growth::Down => unit.clusters.start,
            };
            let c = &self.out.clusters[front];
            if self.has_room(c, block.width()) && c.fits_bands(region) {
                self.join(front, member, block.width(), region);
                self.refresh_contour();
                return;
            }
        }

        let index = self.out.clusters.len();
        let mut c = Cluster::new(self.stripe.x_span(), 0);
        c.push(member, block.width(), region);
        let ly = match self.growth {
            Growth::Up => block.ly().max(self.contour),
            Growth::Down => (block.ly() + block.height()).min(self.contour) - c.height(),
        };
        c.set_ly(ly);
        self.out.clusters.push(c);
        self.out.units.push(Unit {
            clusters: index..index + 1,
            shape: None,
        });
        self.refresh_contour();
    }

    /// Whether every cluster of `unit` is a stack of `well` with room for `block`.
    fn stack_takes(&self, unit: &Unit, block: &Block, well: &WellShape) -> bool {
        unit.shape.as_ref() == Some(well)
            && self.out.clusters[unit.clusters.clone()]
                .iter()
                .all(|c| self.has_room(c, block.width()))
    }

    fn append_multi(&mut self, block: &Block, well: &WellShape) {
        let target = match self.packing {
            Packing::Loose => self
                .out
                .units
                .last()
                .filter(|u| self.overlaps_front(block) && self.stack_takes(u, block, well)),
            Packing::Compact => self
                .out
                .units
                .iter()
                .filter(|u| self.stack_takes(u, block, well))
                .min_by_key(|u| (self.out.clusters[u.clusters.start].ly() - block.ly()).abs()),
        };
        if let Some(unit) = target {
            let clusters = unit.clusters.clone();
            for (region, index) in clusters.enumerate() {
                let member = Member {
                    id: block.id(),
                    region,
                };
                self.out.clusters[index].push(member, block.width(), well.region(region));
            }
            return;
        }

        let base = match self.growth {
            Growth::Up => block.ly().max(self.contour),
            Growth::Down => (block.ly() + block.height()).min(self.contour) - well.height(),
        };
        let start = self.out.clusters.len();
        for region in 0..well.region_count() {
            let orientation = if well.is_p_bottom(region) {
                Orientation::N
            } else {
                Orientation::FS
            };
            let mut c = Cluster::pinned(
                self.stripe.x_span(),
                base + well.region_offset(region),
                well.region(region),
                orientation,
            );
            c.push(
                Member {
                    id: block.id(),
                    region,
                },
                block.width(),
                well.region(region),
            );
            self.out.clusters.push(c);
        }
        self.out.units.push(Unit {
            clusters: start..self.out.clusters.len(),
            shape: Some(well.clone()),
        });
        self.refresh_contour();
    }

    fn run(mut self) -> Layering {
        let blocks = self.blocks;
        let mut order: Vec<&'a Block> = self
            .stripe
            .blocks()
            .iter()
            .map(|id| &blocks[id.index()])
            .collect();
        match self.growth {
            Growth::Up => order.sort_by_key(|b| (b.ly(), b.lx(), b.id())),
            Growth::Down => {
                order.sort_by_key(|b| (std::cmp::Reverse(b.ly() + b.height()), b.lx(), b.id()))
            }
        }
        if self.packing == Packing::Compact {
            order.sort_by_key(|b| !b.well().is_some_and(WellShape::is_multi_region));
        }
        for block in order {
            let Some(well) = block.well() else {
                continue;
            };
            if well.is_multi_region() {
                self.append_multi(block, well);
            } else {
                self.append_single(block, well);
            }
        }
        if self.growth == Growth::Down {
            self.out.units.reverse();
        }
        self.out
    }
}

fn lower_of(
    stripe: &Stripe,
    blocks: &[Block],
    tap_reserve: Coord,
    spacing: Coord,
    packing: Packing,
) -> Layering {
    let up = Clustering::new(stripe, blocks, tap_reserve, Growth::Up, packing).run();
    let down = Clustering::new(stripe, blocks, tap_reserve, Growth::Down, packing).run();
    if down.demand(spacing) < up.demand(spacing) {
        down
    } else {
        up
    }
}

/// Clusters the blocks of a stripe bottom-up and top-down and keeps the layering with the
/// lower [`Layering::demand`] (bottom-up on ties). Blocks without a well shape are skipped.
///
/// Blocks first only join the cluster they reach into. If that layering does not fit the
/// stripe, clustering is repeated with every block joining the nearest cluster with room.
pub fn cluster_stripe(
    stripe: &Stripe,
    blocks: &[Block],
    tap_reserve: Coord,
    spacing: Coord,
) -> Layering {
    let loose = lower_of(stripe, blocks, tap_reserve, spacing, Packing::Loose);
    if loose.demand(spacing) <= stripe.height() {
        return loose;
    }
    let compact = lower_of(stripe, blocks, tap_reserve, spacing, Packing::Compact);
    debug!(
        loose = loose.demand(spacing),
        compact = compact.demand(spacing),
        available = stripe.height(),
        "stripe overflows, clustered compactly"
    );
    if compact.demand(spacing) < loose.demand(spacing) {
        compact
    } else {
        loose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well::stripe::{assign, partition};
    use legalis_model::region::PlacementRegion;

    fn single(id: usize, w: Coord, x: f64, y: f64) -> Block {
        Block::movable(BlockId::new(id), w, 10, x, y).with_well(WellShape::single(6, 4))
    }

    fn double(id: usize, w: Coord, x: f64, y: f64) -> Block {
        Block::movable(BlockId::new(id), w, 20, x, y)
            .with_well(WellShape::new(vec![WellRegion::new(6, 4); 2]))
    }

    fn stripe_in(blocks: &[Block], height: Coord) -> Stripe {
        let region = PlacementRegion::new(0, 100, 0, height, 10, 1).expect("valid region");
        let mut stripes = partition(&region, blocks, 100);
        assign(&mut stripes, &region, blocks, |_| 0);
        stripes.remove(0)
    }

    fn stripe_of(blocks: &[Block]) -> Stripe {
        stripe_in(blocks, 100)
    }

    #[test]
    fn pn_offsets_follow_orientation() {
        let shape = WellShape::new(vec![WellRegion::new(6, 4), WellRegion::new(5, 3)]);
        assert_eq!(pn_offset(&shape, 0, Orientation::N), 6);
        assert_eq!(pn_offset(&shape, 1, Orientation::N), 13);
        // Mirrored: region 1 sits at the bottom with its p-well (5) lowest.
        assert_eq!(pn_offset(&shape, 1, Orientation::FS), 5);
        assert_eq!(pn_offset(&shape, 0, Orientation::FS), 12);
        assert_eq!(member_orientation(&shape, 1, Orientation::FS), Orientation::N);
    }

    #[test]
    fn overlapping_cells_share_a_cluster() {
        let blocks = vec![
            single(0, 10, 0.0, 0.0),
            single(1, 10, 20.0, 4.0),
            single(2, 10, 40.0, 30.0),
        ];
        let layering = cluster_stripe(&stripe_of(&blocks), &blocks, 0, 0);
        assert_eq!(layering.units.len(), 2);
        assert_eq!(layering.clusters[layering.units[0].clusters.start].members().len(), 2);
        assert_eq!(layering.total_height(), 20);
    }

    #[test]
    fn full_clusters_open_new_ones() {
        let blocks: Vec<Block> = (0..3).map(|i| single(i, 40, 0.0, 0.0)).collect();
        let layering = cluster_stripe(&stripe_of(&blocks), &blocks, 10, 0);
        // Two cells and the tap reserve take 90; a third would need 130.
        assert_eq!(layering.units.len(), 2);
        assert_eq!(layering.clusters[0].used_width(), 80);
    }

    #[test]
    fn overflowing_stripes_are_packed_compactly() {
        let blocks = vec![
            single(0, 40, 0.0, 0.0),
            single(1, 90, 0.0, 5.0),
            single(2, 40, 50.0, 8.0),
        ];
        let stripe = stripe_in(&blocks, 20);
        // Joining only the front cluster strands the third cell in a cluster of its own.
        let loose = lower_of(&stripe, &blocks, 0, 0, Packing::Loose);
        assert_eq!(loose.total_height(), 30);
        let layering = cluster_stripe(&stripe, &blocks, 0, 0);
        assert_eq!(layering.total_height(), 20);
        let ids: Vec<BlockId> = layering.clusters[0].members().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![BlockId::new(0), BlockId::new(2)]);
    }

    #[test]
    fn compact_packing_fills_stacks_before_opening_clusters() {
        let blocks = vec![
            single(0, 50, 0.0, 0.0),
            double(1, 50, 0.0, 10.0),
            single(2, 50, 50.0, 25.0),
        ];
        let stripe = stripe_in(&blocks, 20);
        let layering = cluster_stripe(&stripe, &blocks, 0, 0);
        assert_eq!(layering.units.len(), 1);
        assert!(layering.units[0].is_stack());
        assert_eq!(layering.total_height(), 20);
    }

    #[test]
    fn multi_region_cells_open_pinned_stacks() {
        let blocks = vec![
            double(0, 10, 0.0, 0.0),
            double(1, 10, 30.0, 5.0),
            single(2, 5, 60.0, 12.0),
        ];
        let layering = cluster_stripe(&stripe_of(&blocks), &blocks, 0, 0);
        let stack = &layering.units[0];
        assert!(stack.is_stack());
        assert_eq!(stack.clusters.len(), 2);
        let lower = &layering.clusters[stack.clusters.start];
        let upper = &layering.clusters[stack.clusters.start + 1];
        assert!(lower.is_pinned() && upper.is_pinned());
        assert_eq!(lower.orientation(), Orientation::N);
        assert_eq!(upper.orientation(), Orientation::FS);
        assert_eq!(lower.members().len(), 2, "same shape shares the stack");
        assert_eq!(upper.uy() - lower.ly(), 20);
        assert_eq!(layering.units.len(), 1, "the single joins the top of the stack");
        assert_eq!(upper.members().len(), 3);
    }

    #[test]
    fn flip_reflects_members_about_the_midline() {
        let mut blocks = vec![
            single(0, 10, 0.0, 0.0),
            Block::movable(BlockId::new(1), 10, 8, 20.0, 0.0).with_well(WellShape::single(5, 3)),
        ];
        let stripe = stripe_of(&blocks);
        let mut layering = cluster_stripe(&stripe, &blocks, 0, 0);
        assert_eq!(layering.units.len(), 1);
        let c = &mut layering.clusters[0];
        c.place_members(&mut blocks);
        // Cluster bands 6/4, boundary at 6; the short cell sits on it from 1.
        assert_eq!(blocks[1].ly(), 1);
        c.flip(&mut blocks);
        assert_eq!(c.orientation(), Orientation::FS);
        assert_eq!(c.pn_edge(), 4);
        assert_eq!(blocks[0].ly(), 0);
        assert_eq!(blocks[1].ly(), 1);
        assert_eq!(blocks[1].orientation(), Orientation::FS);
        // FS puts the 3 high n-well of the short cell at the bottom: 1 + 3 == 4.
        let well = blocks[1].well().expect("well");
        assert_eq!(blocks[1].ly() + pn_offset(well, 0, Orientation::FS), c.pn_edge());
    }
}
