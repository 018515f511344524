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

use legalis_core::{Coord, geometry::Rect};
use legalis_model::prelude::*;
use legalis_solver::prelude::*;
use serde::Serialize;
use std::{fs::File, io::BufWriter, time::Instant};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const REPORT_PATH: &str = "legalize_report.json";

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct InstanceInfo {
    idx: usize,
    seed: u64,
    region_width: Coord,
    row_count: usize,
    movable_count: usize,
    fixed_count: usize,
    wells: bool,
}

#[derive(Debug, Clone, Serialize)]
struct LegalizerRun {
    legalizer: String,
    success: bool,
    violations: usize,
    elapsed_ms: u128,
    moved: usize,
    total_manhattan: f64,
    mean_manhattan: f64,
    max_manhattan: f64,
    total_squared: f64,
}

#[derive(Debug, Clone, Serialize)]
struct InstanceResult {
    instance: InstanceInfo,
    runs: Vec<LegalizerRun>,
}

#[derive(Debug, Clone, Serialize)]
struct LegalizeReport {
    description: String,
    instances: Vec<InstanceResult>,
}

fn interpolate_u(val0: usize, val1: usize, step: usize, steps: usize) -> usize {
    if steps <= 1 {
        return val1;
    }
    let num = (val1 as isize - val0 as isize) * step as isize;
    (val0 as isize + num / (steps as isize - 1)).max(0) as usize
}

/// Runs `legalize` on a copy of `original` and measures the result.
fn measure<F>(name: &str, original: &Placement, check_rows: bool, legalize: F) -> LegalizerRun
where
    F: FnOnce(&mut Placement) -> Result<(bool, Vec<Rect>), LegalizeError>,
{
    let mut placement = original.clone();
    let t0 = Instant::now();
    let (success, extra) = match legalize(&mut placement) {
        Ok(done) => done,
        Err(e) => {
            warn!(legalizer = name, error = %e, "legalization aborted");
            (false, Vec::new())
        }
    };
    let elapsed = t0.elapsed();

    let violations = audit_with_extra(&placement, AuditOptions { check_rows }, &extra).len();
    let stats = DisplacementStats::between(original.blocks(), placement.blocks());
    info!(
        legalizer = name,
        success,
        violations,
        elapsed_ms = elapsed.as_millis() as u64,
        mean_manhattan = stats.mean_manhattan(),
        "legalizer run"
    );
    LegalizerRun {
        legalizer: name.to_string(),
        success,
        violations,
        elapsed_ms: elapsed.as_millis(),
        moved: stats.moved(),
        total_manhattan: stats.total_manhattan(),
        mean_manhattan: stats.mean_manhattan(),
        max_manhattan: stats.max_manhattan(),
        total_squared: stats.total_squared(),
    }
}

fn main() {
    enable_tracing();

    let n_instances = 6usize;

    let min_width = 200usize;
    let max_width = 2_000usize;

    let min_rows = 10usize;
    let max_rows = 80usize;

    let min_movables = 100usize;
    let max_movables = 8_000usize;

    let min_fixed = 2usize;
    let max_fixed = 24usize;

    let mut results: Vec<InstanceResult> = Vec::with_capacity(n_instances);

    for i in 0..n_instances {
        let region_width = interpolate_u(min_width, max_width, i, n_instances) as Coord;
        let row_count = interpolate_u(min_rows, max_rows, i, n_instances);
        let amt_mov = interpolate_u(min_movables, max_movables, i, n_instances);
        let amt_fix = interpolate_u(min_fixed, max_fixed, i, n_instances);
        let seed: u64 = 42 + (i as u64);

        let cfg = InstanceGenConfigBuilder::new()
            .region_width(region_width)
            .row_count(row_count)
            .amount_movables(amt_mov)
            .amount_fixed(amt_fix)
            .double_height_fraction(0.05)
            .max_utilization(0.6)
            .wells(WellGenSpec::default())
            .seed(seed)
            .build()
            .expect("valid instance config");
        let placement = InstanceGenerator::new(cfg)
            .generate()
            .expect("valid instance");
        info!(
            idx = i,
            blocks = placement.len(),
            region_width,
            row_count,
            "instance generated"
        );

        let mut runs = Vec::with_capacity(3);
        runs.push(measure("tetris", &placement, true, |p| {
            let out = TetrisLegalizer::new(TetrisConfig {
                tallest_first: true,
            })
            .legalize(p)?;
            Ok((out.success, Vec::new()))
        }));
        runs.push(measure("row_sweep", &placement, true, |p| {
            let out = RowSweepLegalizer::default().legalize(p)?;
            Ok((out.success, Vec::new()))
        }));
        runs.push(measure("well_cluster", &placement, false, |p| {
            let mut legalizer = ClusterLegalizer::new(WellLegalizerConfig {
                tap: Some(WellTapSpec::default()),
                ..WellLegalizerConfig::default()
            });
            let out = legalizer.legalize(p)?;
            let taps = out.taps.iter().map(TapCell::footprint).collect();
            Ok((out.success, taps))
        }));

        results.push(InstanceResult {
            instance: InstanceInfo {
                idx: i,
                seed,
                region_width,
                row_count,
                movable_count: placement.relocatable_count(),
                fixed_count: placement.len() - placement.relocatable_count(),
                wells: true,
            },
            runs,
        });
    }

    let report = LegalizeReport {
        description: "Placement legalization: 6 instances from small to big; \
                      tetris vs row sweep vs well-aware clustering."
            .into(),
        instances: results,
    };

    let file = File::create(REPORT_PATH).expect("create legalize_report.json");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    println!();
    println!("=================================================================");
    println!("====================== Legalization Done ========================");
    println!("=================================================================");
    println!();
    println!("Wrote: {}", REPORT_PATH);
}
