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

//! Well-tap insertion.
//!
//! Taps are placed while sweeping the cells of a cluster segment from left to right. When
//! the next cell would end farther than the plug distance from the last tap, a tap is put
//! right in front of it and the frontier moves past the tap and its clearance. A backward
//! pass then pulls everything that spilled over the right edge back inside.

use crate::config::WellTapSpec;
use legalis_core::{Coord, geometry::Rect};
use legalis_model::well::Orientation;

/// A tap cell inserted by the well legalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TapCell {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
    pub orientation: Orientation,
}

impl TapCell {
    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Width to keep free in a span of `length` for the taps it may need.
pub fn tap_reserve(spec: &WellTapSpec, plug: Coord, length: Coord) -> Coord {
    let pitch = (plug - spec.width - spec.clearance).max(1);
    let count = ((length + pitch - 1) / pitch).max(1);
    count * (spec.width + spec.clearance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Cell(usize),
    Tap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TapInserter {
    spec: WellTapSpec,
    plug: Coord,
}

impl TapInserter {
    #[inline]
    pub fn new(spec: WellTapSpec, plug: Coord) -> Self {
        Self { spec, plug }
    }

    /// Inserts taps between `cells`, given as `(x, width)` in left-to-right order inside
    /// `[lower, upper)`, and returns the tap positions.
    ///
    /// `last_tap_end` carries the right edge of the previous tap across segments of the same
    /// cluster. Returns `None`, leaving `cells` untouched, if cells and taps do not fit.
    pub fn insert(
        &self,
        cells: &mut [(Coord, Coord)],
        lower: Coord,
        upper: Coord,
        last_tap_end: &mut Option<Coord>,
    ) -> Option<Vec<Coord>> {
        let footprint = self.spec.width + self.spec.clearance;
        let mut slots: Vec<(Coord, Coord, Slot)> = Vec::with_capacity(cells.len() + 1);
        let mut contour = lower;
        let mut last = *last_tap_end;
        for (i, &(x, width)) in cells.iter().enumerate() {
            let mut start = x.max(contour);
            if last.is_none_or(|end| start + width - end > self.plug) {
                let tap = contour.max(start - footprint);
                slots.push((tap, footprint, Slot::Tap));
                last = Some(tap + self.spec.width);
                contour = tap + footprint;
                start = start.max(contour);
            }
            slots.push((start, width, Slot::Cell(i)));
            contour = start + width;
        }

        let mut limit = upper;
        for slot in slots.iter_mut().rev() {
            slot.0 = slot.0.min(limit - slot.1);
            limit = slot.0;
        }
        if limit < lower {
            return None;
        }

        let mut taps = Vec::new();
        for (x, _, slot) in slots {
            match slot {
                Slot::Cell(i) => cells[i].0 = x,
                Slot::Tap => taps.push(x),
            }
        }
        if let Some(&x) = taps.last() {
            *last_tap_end = Some(x + self.spec.width);
        }
        Some(taps)
    }
}
