//! End-to-end pipeline tests over a recorded account snapshot.
//!
//! Tests:
//! 1. Timeline assembly: source precedence, fallbacks, newest-first order
//! 2. Normalized fields per source kind
//! 3. Full analysis: windows, trades, visible set, ladder
//! 4. Statistics over the analysis output
//! 5. Determinism with a fixed clock

use chrono::{Duration, TimeZone, Utc};
use orderlens_core::domain::{OrderKind, OrderSide, TradeLeg};
use orderlens_core::stats::{instruments, OrderFilter, OrderStats, TradeSummary, TwapStats};
use orderlens_core::{build_timeline, Analysis, EngineConfig, FixedClock, Normalizer, RawSnapshot};

const SNAPSHOT: &str = include_str!("fixtures/snapshot.json");

fn normalizer() -> Normalizer<FixedClock> {
    Normalizer::new(FixedClock(Utc.timestamp_opt(1_800_000_000, 0).unwrap()))
}

fn timeline() -> Vec<orderlens_core::domain::Order> {
    let snapshot = RawSnapshot::from_json(SNAPSHOT).unwrap();
    build_timeline(&snapshot, &normalizer())
}

// ── 1. Timeline assembly ─────────────────────────────────────────────

#[test]
fn timeline_uses_frontend_orders_and_history_fallback() {
    let orders = timeline();

    // 5 frontend open + 3 fills + 2 TWAP slices + 1 cancelled from history.
    assert_eq!(orders.len(), 11);
    assert!(orders.iter().all(|o| o.id.as_str() != "open-1"), "plain open orders superseded");
    assert!(orders.iter().any(|o| o.id.as_str() == "cancelled-301"));
    assert!(orders.iter().all(|o| o.id.as_str() != "cancelled-302"), "filled history excluded");
}

#[test]
fn timeline_is_sorted_newest_first() {
    let orders = timeline();
    assert!(orders.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(orders.first().unwrap().id.as_str(), "open-105");
    assert_eq!(orders.last().unwrap().id.as_str(), "executed-201");
}

// ── 2. Normalized fields ─────────────────────────────────────────────

#[test]
fn twap_slice_is_unwrapped() {
    let orders = timeline();
    let twap = orders.iter().find(|o| o.is_twap() && o.instrument == "SOL").unwrap();

    assert!(twap.id.as_str().starts_with("twap-"));
    assert_eq!(twap.order_id, "");
    assert_eq!(twap.price, "150.5");
    assert_eq!(twap.size, "10");
    let details = twap.twap.as_ref().unwrap();
    assert_eq!(details.direction, "Open Long");
    assert!(details.crossed);
    assert_eq!(details.tid.as_deref(), Some("77"));
    assert_eq!(details.twap_id.as_deref(), Some("12"));
    assert_eq!(details.fee, "0.1");
}

#[test]
fn bare_twap_record_gets_placeholders() {
    let orders = timeline();
    let twap = orders.iter().find(|o| o.is_twap() && o.instrument == "Unknown").unwrap();
    let details = twap.twap.as_ref().unwrap();
    assert_eq!(details.direction, "Unknown");
    assert_eq!(details.fee_token, "USDC");
    assert!(!details.crossed);
    assert_eq!(details.twap_id, None);
}

#[test]
fn cancelled_order_carries_size_breakdown() {
    let orders = timeline();
    let cancelled = orders.iter().find(|o| o.kind == OrderKind::Cancelled).unwrap();
    let details = cancelled.cancellation.as_ref().unwrap();

    assert_eq!(cancelled.price, "1900");
    assert_eq!(details.original_size, "3");
    assert_eq!(details.filled_size, "1");
    assert_eq!(details.cancelled_size, "2");
    assert!((details.unfilled_size - 2.0).abs() < 1e-10);
}

#[test]
fn sell_side_code_is_mapped() {
    let orders = timeline();
    let ask = orders.iter().find(|o| o.id.as_str() == "open-104").unwrap();
    assert_eq!(ask.side, OrderSide::Sell);
}

// ── 3. Full analysis ─────────────────────────────────────────────────

#[test]
fn analysis_over_snapshot() {
    let orders = timeline();
    let analysis = Analysis::run(&orders, &EngineConfig::default());

    // Windows: one per instrument, padded two hours each side.
    assert_eq!(analysis.windows.len(), 4);
    let btc = analysis.windows["BTC"];
    assert_eq!(btc.earliest, Utc.timestamp_opt(1_700_000_001, 0).unwrap() - Duration::hours(2));
    assert_eq!(btc.latest, Utc.timestamp_opt(1_700_000_003, 0).unwrap() + Duration::hours(2));
    assert!(analysis.windows.values().all(|w| w.span() >= Duration::hours(4)));

    // Trades: buy 2@100 against sells 1@110 and 1@120.
    let trades = &analysis.trades;
    assert_eq!(trades.len(), 4);
    assert_eq!(trades[0].leg, TradeLeg::Entry);
    assert!((trades[0].pnl - 10.0).abs() < 1e-10);
    assert_eq!(trades[1].leg, TradeLeg::Exit);
    assert!((trades[2].pnl - 20.0).abs() < 1e-10);
    assert_eq!(trades[3].id.0, "trade-sell-3");

    // Visible: the unpriced open order is hidden; no clustering below threshold.
    assert_eq!(analysis.visible.len(), 10);
    assert!(analysis.visible.iter().all(|o| o.id.as_str() != "open-105"));
    assert!(analysis.visible.iter().all(|o| !o.is_cluster));

    // Ladder: two levels of resting ETH bids.
    assert_eq!(analysis.ladder.len(), 1);
    let levels = &analysis.ladder[0].levels;
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].price, 2000.0);
    assert_eq!(levels[0].order_count, 2);
    assert!((levels[0].total_size - 2.0).abs() < 1e-10);
    assert_eq!(levels[1].price, 1990.0);
}

#[test]
fn low_threshold_clusters_visible_orders() {
    let orders = timeline();
    let config = EngineConfig { cluster_threshold: 2, ..EngineConfig::default() };
    let analysis = Analysis::run(&orders, &config);

    let non_twap: usize =
        analysis.visible.iter().filter(|o| !o.is_twap()).map(|o| o.cluster_size).sum();
    assert_eq!(non_twap, 8);
    assert_eq!(analysis.visible.iter().filter(|o| o.is_twap()).count(), 2);
    // The ladder still counts raw orders.
    assert_eq!(analysis.ladder[0].order_count(), 3);
}

// ── 4. Statistics ────────────────────────────────────────────────────

#[test]
fn statistics_over_snapshot() {
    let orders = timeline();
    let analysis = Analysis::run(&orders, &EngineConfig::default());

    assert_eq!(instruments(&orders), vec!["BTC", "ETH", "SOL", "Unknown"]);

    let twap = TwapStats::compute(&orders);
    assert_eq!(twap.total, 2);
    assert_eq!(twap.crossed, 1);
    assert_eq!(twap.by_direction["Open Long"], 1);

    let stats = OrderStats::compute(&analysis.visible);
    assert_eq!(stats, OrderStats { open: 4, open_buy: 3, open_sell: 1, twap: 2 });

    let summary = TradeSummary::compute(&analysis.trades);
    assert_eq!(summary.matches, 2);
    assert_eq!(summary.winners, 2);
    assert!((summary.total_pnl - 30.0).abs() < 1e-10);
    assert!((summary.win_rate - 1.0).abs() < 1e-10);

    let filter = OrderFilter { search: Some("eth".into()), limit: 3, ..OrderFilter::default() };
    let hits = filter.apply(&analysis.visible);
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|o| o.instrument == "ETH"));
}

// ── 5. Determinism ───────────────────────────────────────────────────

#[test]
fn identical_input_gives_identical_output() {
    let a = Analysis::run(&timeline(), &EngineConfig::default());
    let b = Analysis::run(&timeline(), &EngineConfig::default());
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn empty_snapshot_gives_empty_analysis() {
    let snapshot = RawSnapshot::from_json("{}").unwrap();
    let orders = build_timeline(&snapshot, &normalizer());
    let analysis = Analysis::run(&orders, &EngineConfig::default());
    assert!(orders.is_empty());
    assert!(analysis.trades.is_empty());
    assert!(analysis.ladder.is_empty());
}
