//! Trade — one leg of a FIFO-matched buy/sell pair.

use super::ids::{OrderId, TradeId};
use super::order::OrderSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which end of the round trip a trade record marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeLeg {
    /// Plotted at the buy fill.
    Entry,
    /// Plotted at the sell fill.
    Exit,
}

impl TradeLeg {
    pub fn side(&self) -> OrderSide {
        match self {
            TradeLeg::Entry => OrderSide::Buy,
            TradeLeg::Exit => OrderSide::Sell,
        }
    }
}

/// A matched portion of a buy fill against a sell fill.
///
/// Every match emits two records, an entry and an exit, that share the
/// order IDs, prices and P&L but carry distinct marker prices/timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub instrument: String,
    pub leg: TradeLeg,

    // ── Matched orders ──
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buy_price: f64,
    pub sell_price: f64,
    pub buy_timestamp: DateTime<Utc>,
    pub sell_timestamp: DateTime<Utc>,

    // ── Size and PnL ──
    pub matched_size: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub is_profitable: bool,

    // ── Marker position ──
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn side(&self) -> OrderSide {
        self.leg.side()
    }

    pub fn is_entry(&self) -> bool {
        self.leg == TradeLeg::Entry
    }
}
