//! Criterion benchmarks for Gannigma hot paths.
//!
//! Benchmarks:
//! 1. ATR over growing histories
//! 2. Grid intersection at coarse and very fine steps
//! 3. Full model pipeline against in-memory data

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gannigma_core::data::{CandleProvider, InMemoryProvider, SyntheticProvider};
use gannigma_core::domain::{CandleSeries, SearchMode};
use gannigma_core::indicators::{Atr, Indicator};
use gannigma_core::levels::{
    intersect, Divider, ExpansionPolicy, LevelSequence, PeriodSpan, VolatilityRange,
};
use gannigma_core::models::{run_model, LadderSpec, ModelParams};

// ── Helpers ──────────────────────────────────────────────────────────

fn history(ticker: &str) -> CandleSeries {
    SyntheticProvider::new()
        .fetch_daily_candles(
            ticker,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
        .unwrap()
}

// ── 1. ATR ───────────────────────────────────────────────────────────

fn bench_atr(c: &mut Criterion) {
    let mut group = c.benchmark_group("atr");
    let series = history("BENCH");

    for &len in &[252usize, 1260, 2520] {
        let candles = series.tail(len);
        group.bench_with_input(BenchmarkId::new("atr_14", len), &len, |b, _| {
            b.iter(|| Atr::new(14).compute(black_box(candles)));
        });
    }

    group.finish();
}

// ── 2. Intersection ──────────────────────────────────────────────────

fn bench_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersect");
    let band = VolatilityRange::new(41_250.0, 43_100.0).unwrap();

    // 5.625 * 0.001 is the finest step of the smallest main rhythm
    for &step in &[45.0, 0.3516, 0.0056] {
        let grid = LevelSequence::fixed_grid(step).unwrap();
        group.bench_with_input(
            BenchmarkId::new("fixed_grid", step),
            &grid,
            |b, grid| {
                b.iter(|| {
                    intersect(
                        black_box(grid),
                        black_box(&band),
                        SearchMode::SeekHigh,
                        ExpansionPolicy::GridMembers,
                    )
                });
            },
        );
    }

    let ladder = LevelSequence::range_derived(PeriodSpan::new(38_000.0, 44_000.0), Divider::Sixteen)
        .unwrap();
    group.bench_function("prior_period_stepped", |b| {
        b.iter(|| {
            intersect(
                black_box(&ladder),
                black_box(&band),
                SearchMode::SeekHigh,
                ExpansionPolicy::SteppedFromAnchor,
            )
        });
    });

    group.finish();
}

// ── 3. Model Pipeline ────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_pipeline");
    let provider = InMemoryProvider::new().with_series("BENCH", history("BENCH"));
    let params = ModelParams::new("BENCH", NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());

    let ladders = [
        ("fixed_grid", LadderSpec::FixedGrid { step: 0.3516 }),
        (
            "prior_year",
            LadderSpec::PriorYear {
                divider: Divider::Sixteen,
            },
        ),
        (
            "prior_month",
            LadderSpec::PriorMonth {
                divider: Divider::Sixteen,
            },
        ),
    ];

    for (name, ladder) in &ladders {
        group.bench_function(*name, |b| {
            b.iter(|| run_model(black_box(&provider), black_box(&params), black_box(ladder)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_atr, bench_intersect, bench_pipeline);
criterion_main!(benches);
