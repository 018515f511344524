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

//! Order-preserving displacement optimizer (Abacus-style segment merging).
//!
//! Given variables in a fixed left-to-right order, each with a width and a preferred
//! position, [`DisplacementOptimizer::optimize`] finds non-overlapping integer positions
//! inside `[lower, upper]` that minimize the weighted squared (or absolute) displacement.
//!
//! Variables are consumed left to right. Each one opens a segment at its own optimum; while
//! the newest segment overlaps its predecessor the two are merged and the merged segment is
//! re-placed at the optimum of all its members. The merge loop runs on an explicit stack.

use crate::err::{NonPositiveWeightError, OptimizerError, SpanOverflowError};
use legalis_core::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplacementCost {
    /// `Σ w·(x - x0)²`
    #[default]
    Quadratic,
    /// `Σ w·|x - x0|`
    Linear,
}

/// A secondary pull towards `position` with strength `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub width: Coord,
    pub initial: f64,
    pub weight: f64,
    pub anchor: Option<Anchor>,
}

impl Variable {
    #[inline]
    pub fn new(width: Coord, initial: f64) -> Self {
        Self {
            width,
            initial,
            weight: 1.0,
            anchor: None,
        }
    }

    #[inline]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn with_anchor(mut self, position: f64, weight: f64) -> Self {
        self.anchor = Some(Anchor { position, weight });
        self
    }

    /// The weighted target points of this variable: its initial position and its anchor.
    #[inline]
    fn targets(&self) -> impl Iterator<Item = (f64, f64)> {
        std::iter::once((self.initial, self.weight)).chain(
            self.anchor
                .filter(|a| a.weight > 0.0)
                .map(|a| (a.position, a.weight)),
        )
    }

    /// Total quadratic weight and weighted target sum.
    #[inline]
    fn quadratic_terms(&self) -> (f64, f64) {
        self.targets()
            .fold((0.0, 0.0), |(e, q), (t, w)| (e + w, q + w * t))
    }
}

/// A run of variables `first..end` laid out contiguously from `position`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    first: usize,
    end: usize,
    width: Coord,
    position: Coord,
    /// Sum of member weights (quadratic mode).
    e: f64,
    /// Sum of weighted member targets, each shifted by the member's offset.
    q: f64,
}

impl Segment {
    fn single(index: usize, var: &Variable) -> Self {
        let (e, q) = var.quadratic_terms();
        Self {
            first: index,
            end: index + 1,
            width: var.width,
            position: 0,
            e,
            q,
        }
    }

    fn absorb(&mut self, next: &Segment) {
        self.q += next.q - next.e * self.width as f64;
        self.e += next.e;
        self.width += next.width;
        self.end = next.end;
    }
}

/// Weighted lower median of `points`.
fn weighted_median(points: &mut [(f64, f64)]) -> f64 {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let total: f64 = points.iter().map(|p| p.1).sum();
    let mut acc = 0.0;
    for &(value, weight) in points.iter() {
        acc += weight;
        if 2.0 * acc >= total {
            return value;
        }
    }
    points.last().map_or(0.0, |p| p.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplacementOptimizer {
    cost: DisplacementCost,
}

impl DisplacementOptimizer {
    #[inline]
    pub fn new(cost: DisplacementCost) -> Self {
        Self { cost }
    }

    #[inline]
    pub fn cost(&self) -> DisplacementCost {
        self.cost
    }

    fn unclamped_optimum(&self, seg: &Segment, vars: &[Variable]) -> f64 {
        match self.cost {
            DisplacementCost::Quadratic => seg.q / seg.e,
            DisplacementCost::Linear => {
                let mut points = Vec::with_capacity(2 * (seg.end - seg.first));
                let mut offset = 0.0;
                for var in &vars[seg.first..seg.end] {
                    points.extend(var.targets().map(|(t, w)| (t - offset, w)));
                    offset += var.width as f64;
                }
                weighted_median(&mut points)
            }
        }
    }

    fn place(&self, seg: &mut Segment, vars: &[Variable], lower: Coord, upper: Coord) {
        let x = self.unclamped_optimum(seg, vars).round() as Coord;
        seg.position = x.clamp(lower, upper - seg.width);
    }

    /// Positions for `vars` (in their given order) inside `[lower, upper]`.
    ///
    /// Fails if the total width exceeds `upper - lower` or a weight is not positive.
    pub fn optimize(
        &self,
        vars: &[Variable],
        lower: Coord,
        upper: Coord,
    ) -> Result<Vec<Coord>, OptimizerError> {
        let required: Coord = vars.iter().map(|v| v.width).sum();
        if required > upper - lower {
            return Err(SpanOverflowError::new(required, upper - lower).into());
        }
        for (i, v) in vars.iter().enumerate() {
            let anchor_ok = v.anchor.is_none_or(|a| a.weight >= 0.0 && a.weight.is_finite());
            if !(v.weight > 0.0 && v.weight.is_finite()) || !anchor_ok {
                return Err(NonPositiveWeightError::new(i, v.weight).into());
            }
        }

        let mut stack: Vec<Segment> = Vec::with_capacity(vars.len());
        for (i, var) in vars.iter().enumerate() {
            let mut seg = Segment::single(i, var);
            self.place(&mut seg, vars, lower, upper);
            stack.push(seg);
            while let [.., prev, cur] = stack.as_slice()
                && cur.position < prev.position + prev.width
            {
                let cur = *cur;
                stack.pop();
                if let Some(prev) = stack.last_mut() {
                    prev.absorb(&cur);
                    self.place(prev, vars, lower, upper);
                }
            }
        }

        let mut out = Vec::with_capacity(vars.len());
        for seg in &stack {
            let mut x = seg.position;
            for var in &vars[seg.first..seg.end] {
                out.push(x);
                x += var.width;
            }
        }
        Ok(out)
    }
}

/// The optimizer's objective for `positions`, anchor terms included.
pub fn objective(cost: DisplacementCost, vars: &[Variable], positions: &[Coord]) -> f64 {
    vars.iter()
        .zip(positions)
        .flat_map(|(v, &x)| v.targets().map(move |(t, w)| (x as f64 - t, w)))
        .map(|(d, w)| match cost {
            DisplacementCost::Quadratic => w * d * d,
            DisplacementCost::Linear => w * d.abs(),
        })
        .sum()
}

/// Places one row of `(width, initial_x)` cells, in order, inside `[lower, upper]` with unit
/// weights and quadratic cost.
pub fn abacus_place_row(
    cells: &[(Coord, f64)],
    lower: Coord,
    upper: Coord,
) -> Result<Vec<Coord>, OptimizerError> {
    let vars: Vec<Variable> = cells.iter().map(|&(w, x)| Variable::new(w, x)).collect();
    DisplacementOptimizer::default().optimize(&vars, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn assert_legal(vars: &[Variable], xs: &[Coord], lower: Coord, upper: Coord) {
        assert_eq!(vars.len(), xs.len());
        if let (Some(first), Some(last)) = (xs.first(), xs.last()) {
            assert!(*first >= lower, "first {} below {}", first, lower);
            assert!(
                last + vars[vars.len() - 1].width <= upper,
                "last {} overflows {}",
                last,
                upper
            );
        }
        for i in 1..xs.len() {
            assert!(
                xs[i - 1] + vars[i - 1].width <= xs[i],
                "variables {} and {} overlap: {:?}",
                i - 1,
                i,
                xs
            );
        }
    }

    /// Legal layout that pushes overlapping variables right, then back from the upper bound.
    fn push_right(vars: &[Variable], lower: Coord, upper: Coord) -> Vec<Coord> {
        let mut xs = Vec::with_capacity(vars.len());
        let mut frontier = lower;
        for v in vars {
            let x = (v.initial.round() as Coord).max(frontier);
            xs.push(x);
            frontier = x + v.width;
        }
        let mut ceiling = upper;
        for (x, v) in xs.iter_mut().zip(vars).rev() {
            *x = (*x).min(ceiling - v.width);
            ceiling = *x;
        }
        xs
    }

    #[test]
    fn three_stacked_cells_spread_contiguously() {
        let xs = abacus_place_row(&[(10, 5.0), (10, 5.0), (10, 5.0)], 0, 100).expect("fits");
        assert_eq!(xs, vec![0, 10, 20]);
    }

    #[test]
    fn stacked_cells_center_on_target_when_unbounded() {
        let xs = abacus_place_row(&[(10, 5.0), (10, 5.0), (10, 5.0)], -100, 100).expect("fits");
        assert_eq!(xs, vec![-5, 5, 15]);
    }

    #[test]
    fn non_overlapping_variables_stay_put() {
        let xs = abacus_place_row(&[(4, 0.0), (4, 10.0), (4, 20.4)], 0, 30).expect("fits");
        assert_eq!(xs, vec![0, 10, 20]);
    }

    #[test]
    fn upper_bound_pushes_segment_left() {
        let xs = abacus_place_row(&[(10, 95.0), (10, 95.0)], 0, 100).expect("fits");
        assert_eq!(xs, vec![80, 90]);
    }

    #[test]
    fn weights_pull_the_merged_segment() {
        let vars = [
            Variable::new(10, 0.0).with_weight(3.0),
            Variable::new(10, 0.0).with_weight(1.0),
        ];
        // Optimum of 3x² + (x + 10)² is x = -2.5, rounded away from zero.
        let xs = DisplacementOptimizer::default()
            .optimize(&vars, -50, 50)
            .expect("fits");
        assert_eq!(xs, vec![-3, 7]);
    }

    #[test]
    fn anchor_term_folds_into_the_mean() {
        let vars = [Variable::new(5, 0.0).with_anchor(10.0, 1.0)];
        let xs = DisplacementOptimizer::default()
            .optimize(&vars, 0, 100)
            .expect("fits");
        assert_eq!(xs, vec![5]);
        assert_eq!(objective(DisplacementCost::Quadratic, &vars, &xs), 50.0);
    }

    #[test]
    fn linear_cost_uses_weighted_median() {
        let vars = [
            Variable::new(10, 0.0),
            Variable::new(10, 0.0),
            Variable::new(10, 100.0),
        ];
        let opt = DisplacementOptimizer::new(DisplacementCost::Linear);
        let xs = opt.optimize(&vars, -100, 200).expect("fits");
        // Segment targets are 0 and -10: any start in [-10, 0] is optimal, the lower median
        // picks -10.
        assert_eq!(xs, vec![-10, 0, 100]);
        assert_eq!(objective(DisplacementCost::Linear, &vars, &xs), 10.0);
    }

    #[test]
    fn too_narrow_bounds_are_rejected() {
        let err = abacus_place_row(&[(10, 0.0), (10, 0.0)], 0, 15).unwrap_err();
        assert!(matches!(err, OptimizerError::Overflow(e) if e.required() == 20));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let vars = [Variable::new(1, 0.0).with_weight(0.0)];
        let err = DisplacementOptimizer::default()
            .optimize(&vars, 0, 10)
            .unwrap_err();
        assert!(matches!(err, OptimizerError::NonPositiveWeight(e) if e.index() == 0));
    }

    #[test]
    fn identical_targets_do_not_recurse() {
        let cells: Vec<(Coord, f64)> = (0..10_000).map(|_| (1, 5_000.0)).collect();
        let xs = abacus_place_row(&cells, 0, 20_000).expect("fits");
        // The optimal start of the merged run is 0.5, rounded up.
        assert_eq!(xs[0], 1);
        assert!(xs.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn random_rows_are_legal_and_beat_push_right() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for cost in [DisplacementCost::Quadratic, DisplacementCost::Linear] {
            let opt = DisplacementOptimizer::new(cost);
            for _ in 0..200 {
                let n = rng.random_range(1..12);
                let mut vars: Vec<Variable> = (0..n)
                    .map(|_| {
                        Variable::new(rng.random_range(1..8), rng.random_range(0..60) as f64)
                    })
                    .collect();
                vars.sort_by(|a, b| a.initial.total_cmp(&b.initial));
                let upper = 100;
                let xs = opt.optimize(&vars, 0, upper).expect("fits");
                assert_legal(&vars, &xs, 0, upper);
                let naive = push_right(&vars, 0, upper);
                assert_legal(&vars, &naive, 0, upper);
                // Rounding a segment to the grid costs at most a quarter per unit weight.
                let slack = match cost {
                    DisplacementCost::Quadratic => 0.25 * n as f64,
                    DisplacementCost::Linear => 1e-9,
                };
                assert!(
                    objective(cost, &vars, &xs) <= objective(cost, &vars, &naive) + slack,
                    "{:?}: optimized {:?} is worse than {:?}",
                    cost,
                    xs,
                    naive
                );
            }
        }
    }
}
