//! Trade and analysis export — JSON and CSV.

use anyhow::{Context, Result};
use orderlens_core::domain::Trade;
use orderlens_core::Analysis;
use serde::Serialize;

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON of anything the engine produces.
pub fn export_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output to JSON")
}

/// Full analysis plus the config fingerprint it was produced with.
#[derive(Serialize)]
pub struct AnalysisReport<'a> {
    pub config_fingerprint: String,
    pub analysis: &'a Analysis,
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export trade legs as CSV, one row per leg.
///
/// Columns: id, instrument, leg, buy_order_id, sell_order_id, buy_price,
/// sell_price, buy_time, sell_time, matched_size, pnl, pnl_percent,
/// profitable
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "instrument",
        "leg",
        "buy_order_id",
        "sell_order_id",
        "buy_price",
        "sell_price",
        "buy_time",
        "sell_time",
        "matched_size",
        "pnl",
        "pnl_percent",
        "profitable",
    ])?;

    for t in trades {
        wtr.write_record([
            t.id.to_string(),
            t.instrument.clone(),
            if t.is_entry() { "entry" } else { "exit" }.to_string(),
            t.buy_order_id.to_string(),
            t.sell_order_id.to_string(),
            format!("{:.6}", t.buy_price),
            format!("{:.6}", t.sell_price),
            t.buy_timestamp.to_rfc3339(),
            t.sell_timestamp.to_rfc3339(),
            format!("{:.6}", t.matched_size),
            format!("{:.6}", t.pnl),
            format!("{:.4}", t.pnl_percent),
            t.is_profitable.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
