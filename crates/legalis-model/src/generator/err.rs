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

use legalis_core::Coord;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWidthRangeError {
    min_width: Coord,
    max_width: Coord,
    region_width: Coord,
}

impl CellWidthRangeError {
    pub fn new(min_width: Coord, max_width: Coord, region_width: Coord) -> Self {
        Self {
            min_width,
            max_width,
            region_width,
        }
    }
    pub fn min_width(&self) -> Coord {
        self.min_width
    }
    pub fn max_width(&self) -> Coord {
        self.max_width
    }
    pub fn region_width(&self) -> Coord {
        self.region_width
    }
}

impl Display for CellWidthRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CellWidthRangeError: cell widths [{}, {}] do not fit a region {} wide",
            self.min_width, self.max_width, self.region_width
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceGenConfigBuildError {
    CellWidthRange(CellWidthRangeError),
    InvalidUtilization(f64),
    InvalidJitter(f64),
    MissingRegionWidth,
    MissingRowCount,
    MissingAmountMovables,
}

impl Display for InstanceGenConfigBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InstanceGenConfigBuildError::*;
        match self {
            CellWidthRange(e) => write!(f, "{}", e),
            InvalidUtilization(u) => write!(f, "Utilization {} is not in (0, 1]", u),
            InvalidJitter(s) => write!(f, "Jitter sigma {} is not a finite non-negative number", s),
            MissingRegionWidth => write!(f, "Missing region_width"),
            MissingRowCount => write!(f, "Missing row_count"),
            MissingAmountMovables => write!(f, "Missing amount_movables"),
        }
    }
}

impl std::error::Error for InstanceGenConfigBuildError {}

impl From<CellWidthRangeError> for InstanceGenConfigBuildError {
    fn from(err: CellWidthRangeError) -> Self {
        InstanceGenConfigBuildError::CellWidthRange(err)
    }
}
