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

//! Well-aware legalization by clustering.
//!
//! [`ClusterLegalizer`] keeps the p-well and n-well bands of horizontally adjacent cells
//! continuous. The pipeline:
//!
//! 1. a coarse row sweep that respects row polarity ([`WellRowParity`]);
//! 2. the region is cut into obstacle-free stripes and every block is assigned to one
//!    ([`stripe`]);
//! 3. the blocks of every stripe are grouped into clusters ([`cluster`]);
//! 4. clusters get alternating orientations, bottom to top, matched to the stacks of
//!    multi-region cells;
//! 5. clusters are placed vertically by the displacement optimizer, anchored at the mean
//!    p/n boundary their members had before legalization, and facing p- and n-wells are
//!    flipped or spaced apart;
//! 6. members are placed horizontally inside their cluster, multi-region cells first;
//! 7. optionally, well taps are inserted ([`tap`]).

pub mod cluster;
pub mod stripe;
pub mod tap;

pub use cluster::{Cluster, Member};
pub use stripe::Stripe;
pub use tap::TapCell;

use crate::abacus::{DisplacementOptimizer, Variable};
use crate::config::WellLegalizerConfig;
use crate::err::{LegalizeError, MissingWellShapeError, OptimizerError};
use crate::freespace::IntervalSet;
use crate::policy::WellRowParity;
use crate::sweep::RowSweepLegalizer;
use cluster::{Layering, cluster_stripe, member_orientation, pn_offset};
use legalis_core::{Coord, primitives::Interval};
use legalis_model::{
    block::Block, id::BlockId, placement::Placement, region::PlacementRegion, well::Orientation,
};
use std::collections::HashMap;
use stripe::{assign, column_width, partition};
use tap::{TapInserter, tap_reserve};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterOutcome {
    pub success: bool,
    pub clusters: Vec<Cluster>,
    pub taps: Vec<TapCell>,
    /// Clusters of one stripe closer than the well spacing with a p-well facing an n-well.
    pub well_discontinuities: usize,
    /// Indices of stripes that could not be legalized completely.
    pub failed_stripes: Vec<usize>,
}

/// Orients the units of a layering bottom to top. Stacks keep their own orientation.
///
/// Singles below a stack alternate downwards from it so that the run meets the stack with
/// matching bands. Singles above the last stack alternate upwards, starting with `first` when
/// the layering has no stack.
fn orient(layering: &mut Layering, first: Orientation) {
    let mut next = first;
    let mut run_start = 0;
    for i in 0..=layering.units.len() {
        let stack = layering.units.get(i).map(|u| {
            u.is_stack().then(|| {
                let bottom = layering.clusters[u.clusters.start].orientation();
                let top = layering.clusters[u.clusters.end - 1].orientation();
                (bottom, top)
            })
        });
        match stack {
            Some(None) => continue,
            Some(Some((bottom, top))) => {
                let mut o = bottom;
                for j in (run_start..i).rev() {
                    o = o.flipped();
                    let c = layering.units[j].clusters.start;
                    layering.clusters[c].set_orientation(o);
                }
                next = top.flipped();
            }
            None => {
                for j in run_start..i {
                    let c = layering.units[j].clusters.start;
                    layering.clusters[c].set_orientation(next);
                    next = next.flipped();
                }
            }
        }
        run_start = i + 1;
    }
}

/// Whether `upper` sits closer than `spacing` above `lower` with a p-well facing an n-well.
#[inline]
fn is_discontinuous(lower: &Cluster, upper: &Cluster, spacing: Coord) -> bool {
    upper.ly() < lower.uy() + spacing && lower.orientation() == upper.orientation()
}

/// Whether unit `i` clashes with the unit below it.
fn clashes(layering: &Layering, i: usize, spacing: Coord) -> bool {
    let lower = &layering.clusters[layering.units[i - 1].clusters.end - 1];
    let upper = &layering.clusters[layering.units[i].clusters.start];
    is_discontinuous(lower, upper, spacing)
}

/// Shifts that move units `from..` up until unit `from` clears the unit below it, pushing
/// the units above along. `None` if the top unit would leave the stripe.
fn lift(
    layering: &Layering,
    from: usize,
    spacing: Coord,
    top: Coord,
) -> Option<Vec<(usize, Coord)>> {
    let mut floor = layering.unit_uy(from - 1);
    let mut below = layering.clusters[layering.units[from - 1].clusters.end - 1].orientation();
    let mut shifts = Vec::new();
    for j in from..layering.units.len() {
        let unit = &layering.units[j];
        let bottom = &layering.clusters[unit.clusters.start];
        let gap = if bottom.orientation() == below { spacing } else { 0 };
        let dy = (floor + gap - bottom.ly()).max(0);
        shifts.push((j, dy));
        floor = layering.unit_uy(j) + dy;
        below = layering.clusters[unit.clusters.end - 1].orientation();
    }
    (floor <= top).then_some(shifts)
}

/// Shifts that move units `..to` down until unit `to` clears them, pushing the units below
/// along. `None` if the lowest unit would leave the stripe.
fn sink(
    layering: &Layering,
    to: usize,
    spacing: Coord,
    bottom: Coord,
) -> Option<Vec<(usize, Coord)>> {
    let mut ceiling = layering.unit_ly(to);
    let mut above = layering.clusters[layering.units[to].clusters.start].orientation();
    let mut shifts = Vec::new();
    for j in (0..to).rev() {
        let unit = &layering.units[j];
        let top = &layering.clusters[unit.clusters.end - 1];
        let gap = if top.orientation() == above { spacing } else { 0 };
        let dy = (top.uy() + gap - ceiling).max(0);
        shifts.push((j, -dy));
        ceiling = layering.unit_ly(j) - dy;
        above = layering.clusters[unit.clusters.start].orientation();
    }
    (ceiling >= bottom).then_some(shifts)
}

/// Removes well discontinuities between the placed units of a stripe and returns how many
/// remain.
///
/// A single cluster is flipped when that does not clash with its other neighbour. Otherwise
/// the units above are lifted, or the units below sunk, far enough to keep `spacing` between
/// the facing wells.
fn repair_discontinuities(
    layering: &mut Layering,
    blocks: &mut [Block],
    bounds: Interval<Coord>,
    spacing: Coord,
) -> usize {
    for i in 1..layering.units.len() {
        if !clashes(layering, i, spacing) {
            continue;
        }
        let clusters = &layering.clusters;
        let (lower, upper) = (&layering.units[i - 1], &layering.units[i]);
        let lower_top = lower.clusters.end - 1;
        let upper_bottom = upper.clusters.start;

        let upper_free = !upper.is_stack()
            && layering.units.get(i + 1).is_none_or(|above| {
                let above = &clusters[above.clusters.start];
                let flipped = clusters[upper_bottom].orientation().flipped();
                !(above.ly() < clusters[upper_bottom].uy() + spacing
                    && above.orientation() == flipped)
            });
        let lower_free = !lower.is_stack()
            && (i < 2 || {
                let below = &clusters[layering.units[i - 2].clusters.end - 1];
                let flipped = clusters[lower_top].orientation().flipped();
                !(clusters[lower_top].ly() < below.uy() + spacing
                    && below.orientation() == flipped)
            });

        if upper_free {
            layering.clusters[upper_bottom].flip(blocks);
        } else if lower_free {
            layering.clusters[lower_top].flip(blocks);
        } else if let Some(shifts) = lift(layering, i, spacing, bounds.end())
            .or_else(|| sink(layering, i, spacing, bounds.start()))
        {
            for (unit, dy) in shifts.into_iter().filter(|&(_, dy)| dy != 0) {
                layering.shift_unit(unit, dy, blocks);
            }
        }
    }
    (1..layering.units.len())
        .filter(|&i| clashes(layering, i, spacing))
        .count()
}

/// Well-aware legalizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterLegalizer {
    config: WellLegalizerConfig,
}

impl ClusterLegalizer {
    #[inline]
    pub fn new(config: WellLegalizerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &WellLegalizerConfig {
        &self.config
    }

    /// The distance a cell may have from the last tap.
    #[inline]
    fn plug(&self) -> Coord {
        self.config
            .max_plug_distance_p
            .min(self.config.max_plug_distance_n)
    }

    #[inline]
    fn tap_reserve(&self, length: Coord) -> Coord {
        self.config
            .tap
            .as_ref()
            .map_or(0, |spec| tap_reserve(spec, self.plug(), length))
    }

    /// Orientation of the lowest cluster of `stripe`, alternating with the row it starts in.
    #[inline]
    fn first_orientation(&self, region: &PlacementRegion, stripe: &Stripe) -> Orientation {
        let row = region.row_containing(stripe.y_span().start());
        if WellRowParity::new(self.config.first_row_orient_n).is_row_n(row) {
            Orientation::N
        } else {
            Orientation::FS
        }
    }

    /// Places the units of a stripe vertically and every member on its cluster's p/n
    /// boundary. Returns `false` if the units do not fit into the stripe; they are then
    /// stacked from the bottom.
    fn place_vertically(
        &self,
        stripe: &Stripe,
        layering: &mut Layering,
        blocks: &mut [Block],
        targets: &[Block],
    ) -> Result<bool, LegalizeError> {
        let vars: Vec<Variable> = layering
            .units
            .iter()
            .map(|unit| {
                let mut sum = 0.0;
                let mut count = 0usize;
                let mut offset = 0;
                for c in &layering.clusters[unit.clusters.clone()] {
                    for m in c.members() {
                        let target = &targets[m.id.index()];
                        let Some(well) = target.well() else {
                            continue;
                        };
                        let o = member_orientation(well, m.region, c.orientation());
                        let pn = target.y() + pn_offset(well, m.region, o) as f64;
                        sum += pn - (offset + c.bottom_band()) as f64;
                        count += 1;
                    }
                    offset += c.height();
                }
                let count = count.max(1) as f64;
                Variable::new(layering.unit_height(unit), sum / count).with_weight(count)
            })
            .collect();

        let (lower, upper) = (stripe.y_span().start(), stripe.y_span().end());
        let optimizer = DisplacementOptimizer::new(self.config.cost);
        let (lys, fits) = match optimizer.optimize(&vars, lower, upper) {
            Ok(lys) => (lys, true),
            Err(OptimizerError::Overflow(e)) => {
                warn!(
                    required = e.required(),
                    available = e.available(),
                    "clusters overflow their stripe"
                );
                let mut cursor = lower;
                let lys = vars
                    .iter()
                    .map(|v| {
                        let ly = cursor;
                        cursor += v.width;
                        ly
                    })
                    .collect();
                (lys, false)
            }
            Err(e) => return Err(e.into()),
        };

        for (unit, ly) in lys.into_iter().enumerate() {
            layering.set_unit_ly(unit, ly);
        }
        for c in &layering.clusters {
            c.place_members(blocks);
        }
        Ok(fits)
    }

    /// Settles one shared x for every multi-region cell of the layering.
    ///
    /// Each round places every affected cluster with the optimizer, pulling the cell towards
    /// its current shared x with a weight growing quadratically per round, and moves the
    /// shared x to the mean of the per-cluster results. Finally every cell takes the free
    /// x nearest to its shared x that is free in all of its clusters at once.
    ///
    /// Returns the x-spans taken in every cluster, and whether every cell found a slot.
    fn place_stacked(
        &self,
        layering: &Layering,
        blocks: &mut [Block],
        targets: &[Block],
    ) -> Result<(Vec<Vec<Interval<Coord>>>, bool), LegalizeError> {
        let mut homes: HashMap<BlockId, Vec<usize>> = HashMap::new();
        for (ci, c) in layering.clusters.iter().enumerate() {
            for m in c.members() {
                if blocks[m.id.index()]
                    .well()
                    .is_some_and(|w| w.is_multi_region())
                {
                    homes.entry(m.id).or_default().push(ci);
                }
            }
        }
        let mut walls = vec![Vec::new(); layering.clusters.len()];
        if homes.is_empty() {
            return Ok((walls, true));
        }

        let optimizer = DisplacementOptimizer::new(self.config.cost);
        let mut shared: HashMap<BlockId, f64> = homes
            .keys()
            .map(|&id| (id, targets[id.index()].x()))
            .collect();
        for round in 1..=self.config.anchor_iterations {
            let weight = 0.01 * (round * round) as f64;
            let mut sums: HashMap<BlockId, (f64, usize)> = HashMap::new();
            for c in layering
                .clusters
                .iter()
                .filter(|c| c.members().iter().any(|m| shared.contains_key(&m.id)))
            {
                let order = members_by_target(c, targets);
                let vars: Vec<Variable> = order
                    .iter()
                    .map(|id| {
                        let v = Variable::new(blocks[id.index()].width(), targets[id.index()].x());
                        match shared.get(id) {
                            Some(&x) => v.with_anchor(x, weight),
                            None => v,
                        }
                    })
                    .collect();
                let xs = match optimizer.optimize(&vars, c.x_span().start(), c.x_span().end()) {
                    Ok(xs) => xs,
                    Err(OptimizerError::Overflow(_)) => continue,
                    Err(e) => return Err(e.into()),
                };
                for (id, x) in order.iter().zip(xs) {
                    if shared.contains_key(id) {
                        let e = sums.entry(*id).or_default();
                        e.0 += x as f64;
                        e.1 += 1;
                    }
                }
            }
            for (id, (sum, n)) in sums {
                shared.insert(id, sum / n as f64);
            }
        }

        let mut stacked: Vec<(BlockId, f64)> = shared.into_iter().collect();
        stacked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let mut placed_all = true;
        for (id, x) in stacked {
            let Some(home) = homes.get(&id) else {
                continue;
            };
            let width = blocks[id.index()].width();
            let feasible = home
                .iter()
                .map(|&ci| {
                    let mut free = IntervalSet::full(layering.clusters[ci].x_span());
                    for &wall in &walls[ci] {
                        free.subtract_interval(wall);
                    }
                    free
                })
                .reduce(|acc, free| acc.intersection(&free));
            let target = x.round() as Coord;
            let lx = match feasible.and_then(|f| f.nearest_fit(target, width)) {
                Some(lx) => lx,
                None => {
                    warn!(%id, "no common slot for a multi-region cell");
                    placed_all = false;
                    let span = layering.clusters[home[0]].x_span();
                    target.min(span.end() - width).max(span.start())
                }
            };
            for &ci in home {
                walls[ci].push(Interval::new(lx, lx + width));
            }
            let block = &mut blocks[id.index()];
            let y = block.ly();
            block.set_location(lx, y);
        }
        Ok((walls, placed_all))
    }

    /// Places the single-region members of a cluster into the gaps left by multi-region
    /// cells and inserts taps. Returns whether everything fit.
    fn place_singles(
        &self,
        cluster: &Cluster,
        walls: &[Interval<Coord>],
        blocks: &mut [Block],
        targets: &[Block],
        taps: &mut Vec<TapCell>,
    ) -> Result<bool, LegalizeError> {
        let singles: Vec<BlockId> = members_by_target(cluster, targets)
            .into_iter()
            .filter(|id| !blocks[id.index()].well().is_some_and(|w| w.is_multi_region()))
            .collect();
        if singles.is_empty() {
            return Ok(true);
        }

        let mut free = IntervalSet::full(cluster.x_span());
        for &wall in walls {
            free.subtract_interval(wall);
        }
        let segments = free.into_intervals();
        let mut room: Vec<Coord> = segments
            .iter()
            .map(|s| s.length() - self.tap_reserve(s.length()))
            .collect();
        let mut buckets: Vec<Vec<BlockId>> = vec![Vec::new(); segments.len()];

        let mut fits = true;
        let mut cursor = 0;
        for id in singles {
            let width = blocks[id.index()].width();
            let center = targets[id.index()].x().round() as Coord + width / 2;
            let wanted = segments
                .partition_point(|s| s.end() <= center)
                .min(segments.len().saturating_sub(1));
            let mut seg = cursor.max(wanted);
            while seg < segments.len() && room[seg] < width {
                seg += 1;
            }
            if seg < segments.len() {
                cursor = seg;
            } else if let Some(any) = (0..segments.len()).find(|&s| room[s] >= width) {
                seg = any;
            } else {
                warn!(%id, "no room left in cluster");
                fits = false;
                continue;
            }
            room[seg] -= width;
            buckets[seg].push(id);
        }

        let optimizer = DisplacementOptimizer::new(self.config.cost);
        let mut last_tap = None;
        for (seg, ids) in segments.iter().zip(&buckets) {
            if ids.is_empty() {
                continue;
            }
            let vars: Vec<Variable> = ids
                .iter()
                .map(|id| Variable::new(blocks[id.index()].width(), targets[id.index()].x()))
                .collect();
            let xs = optimizer.optimize(&vars, seg.start(), seg.end())?;
            let mut cells: Vec<(Coord, Coord)> =
                xs.into_iter().zip(&vars).map(|(x, v)| (x, v.width)).collect();

            if let Some(spec) = &self.config.tap {
                let inserter = TapInserter::new(spec.clone(), self.plug());
                match inserter.insert(&mut cells, seg.start(), seg.end(), &mut last_tap) {
                    Some(xs) => taps.extend(xs.into_iter().map(|x| TapCell {
                        x,
                        y: cluster.ly(),
                        width: spec.width,
                        height: cluster.height(),
                        orientation: cluster.orientation(),
                    })),
                    None => {
                        warn!(start = seg.start(), end = seg.end(), "no room for well taps");
                        fits = false;
                    }
                }
            }

            for (&(x, _), id) in cells.iter().zip(ids) {
                let block = &mut blocks[id.index()];
                let y = block.ly();
                block.set_location(x, y);
            }
        }
        Ok(fits)
    }

    /// Legalizes every relocatable block of `placement` in place.
    ///
    /// Every relocatable block needs a well shape. Stripes whose blocks could not be placed
    /// legally are reported in [`ClusterOutcome::failed_stripes`]. The run only succeeds
    /// without failed stripes and without well discontinuities.
    #[instrument(skip_all, fields(blocks = placement.len()))]
    pub fn run(&self, placement: &mut Placement) -> Result<ClusterOutcome, LegalizeError> {
        if let Some(b) = placement
            .blocks()
            .iter()
            .find(|b| b.is_relocatable() && b.well().is_none())
        {
            return Err(MissingWellShapeError::new(b.id()).into());
        }

        let targets: Vec<Block> = placement.blocks().to_vec();
        if let Some(cfg) = &self.config.base_sweep {
            let parity = WellRowParity::new(self.config.first_row_orient_n);
            let coarse = RowSweepLegalizer::with_policy(cfg.clone(), parity).run(placement)?;
            debug!(success = coarse.success, passes = coarse.passes, "coarse row sweep");
        }

        let region = *placement.region();
        let width = column_width(&self.config, &region, placement.blocks());
        let mut stripes = partition(&region, placement.blocks(), width);
        assign(&mut stripes, &region, placement.blocks(), |w| self.tap_reserve(w));
        let unassigned = stripes.is_empty() && placement.relocatable_count() > 0;
        let blocks = placement.blocks_mut();

        let mut outcome = ClusterOutcome::default();
        for (index, stripe) in stripes.iter().enumerate() {
            let reserve = self.tap_reserve(stripe.width());
            let mut layering = cluster_stripe(stripe, blocks, reserve, self.config.well_spacing);
            orient(&mut layering, self.first_orientation(&region, stripe));

            let mut fits = self.place_vertically(stripe, &mut layering, blocks, &targets)?;
            let discontinuities = repair_discontinuities(
                &mut layering,
                blocks,
                stripe.y_span(),
                self.config.well_spacing,
            );
            let (walls, stacked) = self.place_stacked(&layering, blocks, &targets)?;
            fits &= stacked;
            for (c, walls) in layering.clusters.iter().zip(&walls) {
                fits &= self.place_singles(c, walls, blocks, &targets, &mut outcome.taps)?;
            }

            debug!(
                stripe = index,
                clusters = layering.clusters.len(),
                discontinuities,
                fits,
                "stripe legalized"
            );
            if !fits {
                outcome.failed_stripes.push(index);
            }
            outcome.well_discontinuities += discontinuities;
            outcome.clusters.extend(layering.clusters);
        }

        outcome.success =
            outcome.failed_stripes.is_empty() && !unassigned && outcome.well_discontinuities == 0;
        if !outcome.success {
            warn!(
                failed_stripes = outcome.failed_stripes.len(),
                discontinuities = outcome.well_discontinuities,
                unassigned,
                "well legalization incomplete"
            );
        }
        info!(
            success = outcome.success,
            clusters = outcome.clusters.len(),
            taps = outcome.taps.len(),
            discontinuities = outcome.well_discontinuities,
            "cluster legalization finished"
        );
        Ok(outcome)
    }
}

/// Members of a cluster ordered by their x before legalization.
fn members_by_target(cluster: &Cluster, targets: &[Block]) -> Vec<BlockId> {
    let mut ids: Vec<BlockId> = cluster.members().iter().map(|m| m.id).collect();
    ids.sort_by(|a, b| {
        targets[a.index()]
            .x()
            .total_cmp(&targets[b.index()].x())
            .then(a.cmp(b))
    });
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SweepConfig, WellTapSpec};
    use legalis_model::{
        audit::{AuditOptions, audit, audit_with_extra},
        generator::{InstanceGenConfigBuilder, InstanceGenerator, WellGenSpec},
        placement::PlacementBuilder,
        region::PlacementRegion,
        well::{WellRegion, WellShape},
    };

    fn placement(width: Coord, rows: Coord, blocks: Vec<Block>) -> Placement {
        let region = PlacementRegion::new(0, width, 0, rows * 10, 10, 1).expect("valid region");
        let mut b = PlacementBuilder::new(region);
        for block in blocks {
            b.add_block(block).expect("valid block");
        }
        b.build()
    }

    fn single(id: usize, w: Coord, x: f64, y: f64) -> Block {
        Block::movable(BlockId::new(id), w, 10, x, y).with_well(WellShape::single(6, 4))
    }

    fn double(id: usize, w: Coord, x: f64, y: f64) -> Block {
        Block::movable(BlockId::new(id), w, 20, x, y)
            .with_well(WellShape::new(vec![WellRegion::new(6, 4); 2]))
    }

    fn no_audit_rows() -> AuditOptions {
        AuditOptions { check_rows: false }
    }

    /// Every member's p/n boundary lies on its cluster's boundary.
    fn assert_wells_aligned(p: &Placement, outcome: &ClusterOutcome) {
        for c in &outcome.clusters {
            for m in c.members() {
                let b = p.block(m.id);
                let well = b.well().expect("well cells");
                let edge = b.ly() + pn_offset(well, m.region, b.orientation());
                let expected = if m.region == 0 || b.orientation() == Orientation::N {
                    c.pn_edge()
                } else {
                    edge
                };
                assert_eq!(edge, expected, "{} region {}", m.id, m.region);
                assert_eq!(
                    member_orientation(well, m.region, c.orientation()),
                    b.orientation(),
                    "{} region {}",
                    m.id,
                    m.region
                );
            }
        }
    }

    #[test]
    fn blocks_without_wells_are_rejected() {
        let mut p = placement(100, 2, vec![Block::movable(BlockId::new(0), 5, 10, 0.0, 0.0)]);
        let err = ClusterLegalizer::default().run(&mut p).expect_err("missing well");
        let expected = MissingWellShapeError::new(BlockId::new(0));
        assert_eq!(err, LegalizeError::MissingWellShape(expected));
    }

    #[test]
    fn overlapping_cells_share_a_continuous_well() {
        let mut p = placement(
            100,
            3,
            vec![
                single(0, 20, 10.0, 1.0),
                single(1, 20, 15.0, 2.0),
                single(2, 20, 20.0, 0.0),
            ],
        );
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_eq!(out.clusters.len(), 1);
        assert_eq!(out.well_discontinuities, 0);
        let edge = out.clusters[0].pn_edge();
        for b in p.blocks() {
            assert_eq!(b.ly() + pn_offset(b.well().expect("well"), 0, b.orientation()), edge);
        }
        assert_wells_aligned(&p, &out);
    }

    #[test]
    fn multi_region_cells_share_one_x_across_their_stack() {
        let double = WellShape::new(vec![WellRegion::new(6, 4); 2]);
        let mut p = placement(
            100,
            4,
            vec![
                Block::movable(BlockId::new(0), 10, 20, 40.0, 0.0).with_well(double),
                single(1, 30, 35.0, 0.0),
                single(2, 30, 45.0, 10.0),
            ],
        );
        let out = ClusterLegalizer::default().run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_wells_aligned(&p, &out);
        let stacked: Vec<&Cluster> = out
            .clusters
            .iter()
            .filter(|c| c.members().iter().any(|m| m.id == BlockId::new(0)))
            .collect();
        assert_eq!(stacked.len(), 2);
        assert!(stacked.iter().all(|c| c.is_pinned()));
    }

    #[test]
    fn taps_keep_every_cell_within_plug_distance() {
        let cells = (0..8).map(|i| single(i, 10, i as f64 * 10.0, 0.0)).collect();
        let mut p = placement(200, 2, cells);
        let cfg = WellLegalizerConfig {
            max_plug_distance_p: 30,
            max_plug_distance_n: 40,
            column_width: Some(200),
            tap: Some(WellTapSpec {
                width: 2,
                clearance: 1,
            }),
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        let taps: Vec<_> = out.taps.iter().map(TapCell::footprint).collect();
        assert!(audit_with_extra(&p, no_audit_rows(), &taps).is_empty());
        assert!(out.taps.len() >= 2);
        for b in p.blocks() {
            let span = b.footprint().x_span();
            let mut nearest = Coord::MAX;
            for t in out.taps.iter().filter(|t| t.y <= b.ly() && b.ly() < t.y + t.height) {
                let tap = Interval::new(t.x, t.x + t.width + 1);
                assert!(!tap.overlaps(&span), "tap {:?} on {}", t, b.id());
                if t.x + t.width <= span.start() {
                    nearest = nearest.min(span.end() - (t.x + t.width));
                }
            }
            assert!(nearest <= 30, "{} is {} away from a tap", b.id(), nearest);
        }
    }

    #[test]
    fn overfull_stripe_is_reported() {
        let cells = (0..6).map(|i| single(i, 40, 0.0, 0.0)).collect();
        let mut p = placement(50, 2, cells);
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(!out.success);
        assert_eq!(out.failed_stripes, vec![0]);
    }

    #[test]
    fn single_under_a_stack_takes_the_opposite_orientation() {
        // A single cluster directly under a stack whose bottom is N must be FS.
        let double = WellShape::new(vec![WellRegion::new(6, 4); 2]);
        let mut p = placement(
            100,
            4,
            vec![
                single(0, 10, 0.0, 0.0),
                Block::movable(BlockId::new(1), 10, 20, 50.0, 10.0).with_well(double),
            ],
        );
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.success);
        assert_eq!(out.well_discontinuities, 0);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_eq!(p.block(BlockId::new(0)).orientation(), Orientation::FS);
        assert_wells_aligned(&p, &out);
    }

    #[test]
    fn facing_wells_between_stacks_are_spaced_apart() {
        // Between two N-bottomed stacks the single matches the upper one and faces the FS top
        // of the lower one, so the upper units move up by the well spacing.
        let mut p = placement(
            100,
            6,
            vec![
                double(0, 10, 0.0, 0.0),
                single(1, 10, 0.0, 20.0),
                double(2, 10, 0.0, 30.0),
            ],
        );
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        assert_eq!(out.well_discontinuities, 0);
        assert_eq!(p.block(BlockId::new(1)).orientation(), Orientation::FS);
        assert_eq!(p.block(BlockId::new(1)).ly(), 21);
        assert_eq!(p.block(BlockId::new(2)).ly(), 31);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_wells_aligned(&p, &out);
    }

    #[test]
    fn discontinuities_without_room_fail_the_run() {
        // Too wide to share clusters, and the stripe has no row to spare.
        let mut p = placement(
            100,
            5,
            vec![
                double(0, 60, 0.0, 0.0),
                single(1, 60, 0.0, 20.0),
                double(2, 60, 0.0, 30.0),
            ],
        );
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.failed_stripes.is_empty());
        assert_eq!(out.well_discontinuities, 1);
        assert!(!out.success);
    }

    #[test]
    fn cells_beside_a_small_macro_keep_its_rows() {
        let mut p = placement(
            100,
            3,
            vec![
                Block::fixed(BlockId::new(0), 20, 10, 40, 10),
                single(1, 10, 20.0, 10.0),
                single(2, 10, 70.0, 10.0),
                single(3, 10, 45.0, 12.0),
            ],
        );
        let cfg = WellLegalizerConfig {
            base_sweep: None,
            ..WellLegalizerConfig::default()
        };
        let out = ClusterLegalizer::new(cfg).run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_eq!(out.clusters.len(), 3);
        assert_eq!(p.block(BlockId::new(1)).ly(), 10);
        assert_eq!(p.block(BlockId::new(2)).ly(), 10);
        // The cell on the macro is nearest to the free row above it.
        assert_eq!(p.block(BlockId::new(3)).ly(), 20);
        assert_wells_aligned(&p, &out);
    }

    #[test]
    fn generated_instance_with_macros_and_double_height_cells_is_legal() {
        for seed in [1, 2, 3] {
            let cfg = InstanceGenConfigBuilder::new()
                .region_width(300)
                .row_count(15)
                .amount_movables(120)
                .amount_fixed(3)
                .max_macro_rows(3)
                .double_height_fraction(0.15)
                .max_utilization(0.4)
                .wells(WellGenSpec::default())
                .seed(seed)
                .build()
                .expect("valid config");
            let mut p = InstanceGenerator::new(cfg).generate().expect("instance");
            assert!(p.blocks().iter().any(Block::is_obstacle));
            let legalizer = ClusterLegalizer::new(WellLegalizerConfig {
                tap: Some(WellTapSpec::default()),
                ..WellLegalizerConfig::default()
            });
            let out = legalizer.run(&mut p).expect("no contract breach");
            assert!(
                out.success,
                "seed {seed}: {:?}, {} discontinuities",
                out.failed_stripes, out.well_discontinuities
            );
            let taps: Vec<_> = out.taps.iter().map(TapCell::footprint).collect();
            assert!(audit_with_extra(&p, no_audit_rows(), &taps).is_empty(), "seed {seed}");
            assert_wells_aligned(&p, &out);
        }
    }

    #[test]
    fn generated_single_height_instance_is_legal() {
        let cfg = InstanceGenConfigBuilder::new()
            .region_width(300)
            .row_count(15)
            .amount_movables(100)
            .amount_fixed(0)
            .max_utilization(0.5)
            .wells(WellGenSpec::default())
            .seed(4)
            .build()
            .expect("valid config");
        let mut p = InstanceGenerator::new(cfg).generate().expect("instance");
        let legalizer = ClusterLegalizer::new(WellLegalizerConfig {
            base_sweep: Some(SweepConfig {
                compaction: None,
                ..SweepConfig::default()
            }),
            ..WellLegalizerConfig::default()
        });
        let out = legalizer.run(&mut p).expect("no contract breach");
        assert!(out.success, "{:?}", out.failed_stripes);
        assert!(audit(&p, no_audit_rows()).is_empty());
        assert_wells_aligned(&p, &out);
    }
}
