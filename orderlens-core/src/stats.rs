//! Timeline queries and summary statistics.
//!
//! All functions are pure reads over engine output: filtering the order list
//! for display, and counting orders, TWAP slices and trade results.

use crate::domain::{Order, OrderKind, OrderSide, Trade};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of orders returned by [`OrderFilter::apply`].
pub const DEFAULT_ORDER_LIMIT: usize = 10;

/// Sorted, de-duplicated instruments present in `orders`.
pub fn instruments(orders: &[Order]) -> Vec<String> {
    orders
        .iter()
        .map(|o| o.instrument.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Order-list query: optional instrument, optional free-text search, and a
/// result limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub instrument: Option<String>,
    pub search: Option<String>,
    pub limit: usize,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self { instrument: None, search: None, limit: DEFAULT_ORDER_LIMIT }
    }
}

impl OrderFilter {
    /// True when `order` passes the instrument and search criteria.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(instrument) = &self.instrument {
            if &order.instrument != instrument {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => search_matches(order, &term.to_lowercase()),
        }
    }

    /// First `limit` matching orders, in input order.
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).take(self.limit).collect()
    }
}

/// Case-insensitive match of an already-lowercased term.
fn search_matches(order: &Order, term: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(term);

    if contains(&order.instrument)
        || contains(&order.order_id)
        || contains(order.side.as_str())
        || contains(order.status().as_str())
    {
        return true;
    }
    if let Some(twap) = &order.twap {
        if contains(&twap.direction) || (twap.crossed && "crossed".contains(term)) {
            return true;
        }
    }
    order.is_twap() && "twap".contains(term)
}

/// TWAP slice counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwapStats {
    pub total: usize,
    pub by_instrument: BTreeMap<String, usize>,
    pub by_direction: BTreeMap<String, usize>,
    pub crossed: usize,
}

impl TwapStats {
    pub fn compute(orders: &[Order]) -> Self {
        let mut stats = Self::default();
        for order in orders.iter().filter(|o| o.is_twap()) {
            stats.total += 1;
            *stats.by_instrument.entry(order.instrument.clone()).or_default() += 1;
            if let Some(twap) = &order.twap {
                *stats.by_direction.entry(twap.direction.clone()).or_default() += 1;
                if twap.crossed {
                    stats.crossed += 1;
                }
            }
        }
        stats
    }
}

/// Counts over a (possibly clustered) display set. Cluster members count
/// as one order each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    pub open: usize,
    pub open_buy: usize,
    pub open_sell: usize,
    pub twap: usize,
}

impl OrderStats {
    pub fn compute(orders: &[Order]) -> Self {
        let mut stats = Self::default();
        for order in orders {
            match order.kind {
                OrderKind::Open => {
                    let n = order.cluster_size.max(1);
                    stats.open += n;
                    match order.side {
                        OrderSide::Buy => stats.open_buy += n,
                        OrderSide::Sell => stats.open_sell += n,
                    }
                }
                OrderKind::Twap => stats.twap += 1,
                OrderKind::Executed | OrderKind::Cancelled => {}
            }
        }
        stats
    }
}

/// Round-trip results, counted once per match (entry legs only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub matches: usize,
    /// Sum of finite P&L values. Legs with NaN P&L are excluded.
    pub total_pnl: f64,
    pub winners: usize,
    pub losers: usize,
    /// Fraction of matches with positive P&L; 0 when there are none.
    pub win_rate: f64,
}

impl TradeSummary {
    pub fn compute(trades: &[Trade]) -> Self {
        let entries: Vec<&Trade> = trades.iter().filter(|t| t.is_entry()).collect();
        let matches = entries.len();
        let total_pnl = entries.iter().map(|t| t.pnl).filter(|p| p.is_finite()).sum();
        let winners = entries.iter().filter(|t| t.pnl > 0.0).count();
        let losers = entries.iter().filter(|t| t.pnl < 0.0).count();
        let win_rate = if matches == 0 { 0.0 } else { winners as f64 / matches as f64 };

        Self { matches, total_pnl, winners, losers, win_rate }
    }
}
