//! Criterion benchmarks for OrderLens hot paths.
//!
//! Benchmarks:
//! 1. Normalization + timeline assembly from a raw snapshot
//! 2. FIFO trade matching over executed fills
//! 3. Display clustering above threshold
//! 4. Ladder grouping of resting bids
//! 5. Full analysis pass

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use orderlens_core::domain::{Order, OrderId, OrderKind, OrderSide};
use orderlens_core::engine::{build_ladder, cluster_orders, match_trades};
use orderlens_core::{build_timeline, Analysis, EngineConfig, FixedClock, Normalizer, RawRecord, RawSnapshot};

// ── Helpers ──────────────────────────────────────────────────────────

const INSTRUMENTS: [&str; 4] = ["BTC", "ETH", "SOL", "ARB"];

fn make_orders(n: usize, kind: OrderKind) -> Vec<Order> {
    (0..n)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Order {
                id: OrderId::from_venue(kind.id_prefix(), &i.to_string()),
                order_id: i.to_string(),
                instrument: INSTRUMENTS[i % INSTRUMENTS.len()].to_string(),
                side: if i % 3 == 0 { OrderSide::Sell } else { OrderSide::Buy },
                size: format!("{:.2}", 0.5 + (i % 7) as f64 * 0.25),
                price: format!("{price:.2}"),
                kind,
                timestamp: Utc.timestamp_opt(1_700_000_000 + (i as i64) * 17, 0).unwrap(),
                reduce_only: false,
                twap: None,
                cancellation: None,
                cluster_size: 1,
                is_cluster: false,
            }
        })
        .collect()
}

fn make_mixed(n: usize) -> Vec<Order> {
    let mut orders = make_orders(n / 2, OrderKind::Open);
    orders.extend(make_orders(n / 2, OrderKind::Executed));
    orders
}

fn make_snapshot(n: usize) -> RawSnapshot {
    let record = |i: usize, time_key: &str, price_key: &str| {
        RawRecord::new(json!({
            "oid": i,
            "coin": INSTRUMENTS[i % INSTRUMENTS.len()],
            "side": if i % 2 == 0 { "B" } else { "A" },
            "sz": "1.0",
            price_key: format!("{:.2}", 100.0 + (i % 50) as f64),
            time_key: 1_700_000_000_000_i64 + i as i64 * 1_000,
        }))
    };
    RawSnapshot {
        open_orders: (0..n).map(|i| record(i, "timestamp", "limitPx")).collect(),
        fills: (0..n).map(|i| record(n + i, "time", "px")).collect(),
        twap_slice_fills: (0..n / 10)
            .map(|i| RawRecord::new(json!({ "fill": record(2 * n + i, "time", "px").0, "twapId": i })))
            .collect(),
        ..RawSnapshot::default()
    }
}

fn fixed_normalizer() -> Normalizer<FixedClock> {
    Normalizer::new(FixedClock(Utc.timestamp_opt(1_800_000_000, 0).unwrap()))
}

// ── 1. Timeline Assembly ─────────────────────────────────────────────

fn bench_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline");
    let normalizer = fixed_normalizer();

    for &n in &[1_000, 10_000] {
        let snapshot = make_snapshot(n);
        group.bench_with_input(BenchmarkId::new("build", n), &n, |b, _| {
            b.iter(|| build_timeline(black_box(&snapshot), &normalizer));
        });
    }

    group.finish();
}

// ── 2. Trade Matching ────────────────────────────────────────────────

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_trades");

    for &n in &[1_000, 10_000, 50_000] {
        let fills = make_orders(n, OrderKind::Executed);
        group.bench_with_input(BenchmarkId::new("fifo", n), &n, |b, _| {
            b.iter(|| match_trades(black_box(&fills)));
        });
    }

    group.finish();
}

// ── 3. Clustering ────────────────────────────────────────────────────

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_orders");
    let config = EngineConfig::default();

    for &n in &[501, 5_000, 50_000] {
        let orders = make_orders(n, OrderKind::Open);
        group.bench_with_input(BenchmarkId::new("above_threshold", n), &n, |b, _| {
            b.iter(|| cluster_orders(black_box(&orders), &config));
        });
    }

    group.finish();
}

// ── 4. Ladder ────────────────────────────────────────────────────────

fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_ladder");
    let config = EngineConfig::default();

    for &n in &[1_000, 10_000] {
        let orders = make_orders(n, OrderKind::Open);
        group.bench_with_input(BenchmarkId::new("open_bids", n), &n, |b, _| {
            b.iter(|| {
                build_ladder(
                    black_box(&orders),
                    config.ladder_price_tolerance,
                    config.ladder_band_size,
                )
            });
        });
    }

    group.finish();
}

// ── 5. Full Analysis ─────────────────────────────────────────────────

fn bench_analysis(c: &mut Criterion) {
    let orders = make_mixed(20_000);
    let config = EngineConfig::default();

    c.bench_function("analysis_20k", |b| {
        b.iter(|| Analysis::run(black_box(&orders), &config));
    });
}

criterion_group!(
    benches,
    bench_timeline,
    bench_matcher,
    bench_cluster,
    bench_ladder,
    bench_analysis,
);
criterion_main!(benches);
