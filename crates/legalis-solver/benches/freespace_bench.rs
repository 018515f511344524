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

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use legalis_core::{Coord, primitives::Interval};
use legalis_solver::freespace::RowFreeSpace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

const SEED: u64 = 0x1E6A_115;

// A wide row, roughly a few thousand sites.
const ROW_WIDTH: Coord = 20_000;
const OBSTACLES: usize = 400;
const CELL_MIN: Coord = 2;
const CELL_MAX: Coord = 40;
const QUERIES: usize = 5_000;

#[inline]
fn iv(a: Coord, b: Coord) -> Interval<Coord> {
    Interval::new(a, b)
}

/// A row with random obstacles punched into it.
fn fragmented_row(rng: &mut ChaCha8Rng) -> RowFreeSpace {
    let mut row = RowFreeSpace::full(iv(0, ROW_WIDTH));
    for _ in 0..OBSTACLES {
        let w = rng.random_range(CELL_MIN..=CELL_MAX);
        let x = rng.random_range(0..ROW_WIDTH - w);
        row.subtract_interval(iv(x, x + w));
    }
    row
}

fn bench_nearest_fit(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let row = fragmented_row(&mut rng);
    let queries: Vec<(Coord, Coord)> = (0..QUERIES)
        .map(|_| {
            (
                rng.random_range(0..ROW_WIDTH),
                rng.random_range(CELL_MIN..=CELL_MAX),
            )
        })
        .collect();

    c.bench_function("nearest_fit", |b| {
        b.iter(|| {
            for &(target, width) in &queries {
                black_box(row.nearest_fit(black_box(target), black_box(width)));
            }
        })
    });
}

fn bench_allocate_free(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0xA5);
    let row = fragmented_row(&mut rng);
    let widths: Vec<Coord> = (0..QUERIES)
        .map(|_| rng.random_range(CELL_MIN..=CELL_MAX))
        .collect();

    c.bench_function("allocate_then_free", |b| {
        b.iter_batched(
            || row.clone(),
            |mut row| {
                let mut taken = Vec::with_capacity(widths.len());
                for &w in &widths {
                    if let Some(x) = row.first_fit_at_or_after(0, w)
                        && row.allocate(x, w).is_ok()
                    {
                        taken.push(iv(x, x + w));
                    }
                }
                for span in taken {
                    row.insert(span);
                }
                black_box(row)
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_intersection(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED ^ 0x5A);
    let rows: Vec<RowFreeSpace> = (0..4).map(|_| fragmented_row(&mut rng)).collect();

    c.bench_function("intersect_four_rows", |b| {
        b.iter(|| {
            let mut common = rows[0].clone();
            for row in &rows[1..] {
                common.intersect(row);
            }
            black_box(common)
        })
    });
}

criterion_group!(
    freespace,
    bench_nearest_fit,
    bench_allocate_free,
    bench_intersection
);
criterion_main!(freespace);
