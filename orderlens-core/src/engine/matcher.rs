//! Trade matcher — FIFO-matches executed buy fills against sell fills.
//!
//! Pure function: canonical orders → trade legs. Only `Executed` orders take
//! part; TWAP slices, open and cancelled orders are ignored.

use crate::domain::{Order, OrderKind, OrderSide, Trade, TradeId, TradeLeg};
use std::collections::{BTreeMap, VecDeque};

/// A fill with its unmatched size. Lives only for one matching pass.
struct WorkingFill<'a> {
    order: &'a Order,
    remaining: f64,
}

impl<'a> WorkingFill<'a> {
    fn new(order: &'a Order) -> Self {
        Self { order, remaining: order.size_value() }
    }
}

/// Match executed fills into closed trades.
///
/// Per instrument (instruments in sorted order), fills are sorted by
/// timestamp (stable) and split into buys and sells. Each buy, oldest
/// first, consumes the oldest sells until it is exhausted or no sells
/// remain. Every match emits an entry leg followed by an exit leg.
/// Unmatched remainders produce nothing.
///
/// Trade IDs are positional (`trade-buy-<n>`, `trade-sell-<n>` with `n`
/// the output length at emission), so the output must not be reordered
/// without renumbering.
pub fn match_trades(orders: &[Order]) -> Vec<Trade> {
    let _span = tracing::debug_span!("match_trades", orders = orders.len()).entered();

    let mut by_instrument: BTreeMap<&str, Vec<&Order>> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.kind == OrderKind::Executed) {
        by_instrument.entry(order.instrument.as_str()).or_default().push(order);
    }

    let mut trades = Vec::new();

    for (instrument, mut fills) in by_instrument {
        fills.sort_by_key(|o| o.timestamp);

        let (buys, sells): (Vec<&Order>, Vec<&Order>) =
            fills.into_iter().partition(|o| o.side == OrderSide::Buy);
        let mut sell_queue: VecDeque<WorkingFill<'_>> =
            sells.into_iter().map(WorkingFill::new).collect();

        for buy in buys.into_iter().map(WorkingFill::new) {
            let mut buy_remaining = buy.remaining;

            while buy_remaining > 0.0 {
                let Some(sell) = sell_queue.front_mut() else {
                    break;
                };
                // Exhausted (or unparseable) sells are dropped without consuming the buy.
                if !(sell.remaining > 0.0) {
                    sell_queue.pop_front();
                    continue;
                }

                let matched = buy_remaining.min(sell.remaining);
                push_match(&mut trades, instrument, buy.order, sell.order, matched);

                buy_remaining -= matched;
                sell.remaining -= matched;
                if sell.remaining <= 0.0 {
                    sell_queue.pop_front();
                }
            }
        }
    }

    let non_finite = trades.iter().filter(|t| !t.pnl.is_finite()).count();
    if non_finite > 0 {
        tracing::warn!(legs = non_finite, "trades with non-numeric PnL (unparseable fill price)");
    }
    tracing::debug!(legs = trades.len(), "trades matched");
    trades
}

/// Append the entry and exit legs of one match.
fn push_match(trades: &mut Vec<Trade>, instrument: &str, buy: &Order, sell: &Order, size: f64) {
    let buy_price = buy.price_value();
    let sell_price = sell.price_value();
    let pnl = (sell_price - buy_price) * size;
    let pnl_percent = (sell_price - buy_price) / buy_price * 100.0;

    let leg = |id: String, leg: TradeLeg| {
        let (price, timestamp) = match leg {
            TradeLeg::Entry => (buy_price, buy.timestamp),
            TradeLeg::Exit => (sell_price, sell.timestamp),
        };
        Trade {
            id: TradeId::new(id),
            instrument: instrument.to_string(),
            leg,
            buy_order_id: buy.id.clone(),
            sell_order_id: sell.id.clone(),
            buy_price,
            sell_price,
            buy_timestamp: buy.timestamp,
            sell_timestamp: sell.timestamp,
            matched_size: size,
            pnl,
            pnl_percent,
            is_profitable: pnl > 0.0,
            price,
            timestamp,
        }
    };

    let entry = leg(format!("trade-buy-{}", trades.len()), TradeLeg::Entry);
    trades.push(entry);
    let exit = leg(format!("trade-sell-{}", trades.len()), TradeLeg::Exit);
    trades.push(exit);
}
