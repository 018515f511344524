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

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use legalis_model::{
    generator::{InstanceGenConfigBuilder, InstanceGenerator, WellGenSpec},
    placement::Placement,
};
use legalis_solver::prelude::*;
use std::hint::black_box;

const SEED: u64 = 0xCE11;

// (region width, rows, movables)
const SIZES: [(i64, usize, usize); 3] = [(400, 20, 300), (1_000, 50, 2_000), (2_000, 100, 8_000)];

fn instance(width: i64, rows: usize, movables: usize, wells: bool) -> Placement {
    let builder = InstanceGenConfigBuilder::new()
        .region_width(width)
        .row_count(rows)
        .amount_movables(movables)
        .amount_fixed(rows / 5)
        .double_height_fraction(0.05)
        .max_utilization(0.6)
        .seed(SEED);
    let builder = if wells {
        builder.wells(WellGenSpec::default())
    } else {
        builder
    };
    let cfg = builder.build().expect("valid bench config");
    InstanceGenerator::new(cfg)
        .generate()
        .expect("valid bench instance")
}

fn bench_legalizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("legalize");
    group.sample_size(10);
    for (width, rows, movables) in SIZES {
        let plain = instance(width, rows, movables, false);
        let wells = instance(width, rows, movables, true);

        group.bench_with_input(BenchmarkId::new("tetris", movables), &plain, |b, p| {
            b.iter_batched(
                || p.clone(),
                |mut p| black_box(TetrisLegalizer::default().legalize(&mut p)),
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("row_sweep", movables), &plain, |b, p| {
            b.iter_batched(
                || p.clone(),
                |mut p| black_box(RowSweepLegalizer::default().legalize(&mut p)),
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("cluster", movables), &wells, |b, p| {
            b.iter_batched(
                || p.clone(),
                |mut p| black_box(ClusterLegalizer::default().legalize(&mut p)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(legalizers, bench_legalizers);
criterion_main!(legalizers);
