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
use std::fmt::Display;

/// Displacement of relocatable blocks between two snapshots of the same placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplacementStats {
    moved: usize,
    total_manhattan: f64,
    max_manhattan: f64,
    total_squared: f64,
    count: usize,
}

impl DisplacementStats {
    /// # Panics
    ///
    /// Panics if the snapshots have different lengths.
    pub fn between(before: &[Block], after: &[Block]) -> Self {
        assert_eq!(
            before.len(),
            after.len(),
            "DisplacementStats::between: snapshots differ in length"
        );
        let mut stats = Self::default();
        for (b, a) in before.iter().zip(after).filter(|(b, _)| b.is_relocatable()) {
            let dx = a.x() - b.x();
            let dy = a.y() - b.y();
            let manhattan = dx.abs() + dy.abs();
            stats.count += 1;
            if manhattan > 0.0 {
                stats.moved += 1;
            }
            stats.total_manhattan += manhattan;
            stats.total_squared += dx * dx + dy * dy;
            stats.max_manhattan = stats.max_manhattan.max(manhattan);
        }
        stats
    }

    #[inline]
    pub fn moved(&self) -> usize {
        self.moved
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn total_manhattan(&self) -> f64 {
        self.total_manhattan
    }

    #[inline]
    pub fn max_manhattan(&self) -> f64 {
        self.max_manhattan
    }

    #[inline]
    pub fn total_squared(&self) -> f64 {
        self.total_squared
    }

    #[inline]
    pub fn mean_manhattan(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_manhattan / self.count as f64
        }
    }
}

impl Display for DisplacementStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "moved {}/{}, total {:.1}, mean {:.2}, max {:.1}",
            self.moved,
            self.count,
            self.total_manhattan,
            self.mean_manhattan(),
            self.max_manhattan
        )
    }
}
