//! Ladder grouping — resting buy orders stacked by price level.

use super::quantize::relative_price_key;
use crate::domain::{Order, OrderId, OrderKind, OrderSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One quantized price level of the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderLevel {
    /// Price of the first order seen at this level.
    pub price: f64,
    pub order_count: usize,
    pub total_size: f64,
    /// Timestamp of the first order seen at this level.
    pub timestamp: DateTime<Utc>,
    pub order_ids: Vec<OrderId>,
}

/// Up to `band_size` consecutive levels, rendered as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderBand {
    pub index: usize,
    pub levels: Vec<LadderLevel>,
}

impl LadderBand {
    /// Price of the highest level in the band.
    pub fn top_price(&self) -> Option<f64> {
        self.levels.first().map(|l| l.price)
    }

    pub fn order_count(&self) -> usize {
        self.levels.iter().map(|l| l.order_count).sum()
    }

    pub fn total_size(&self) -> f64 {
        self.levels.iter().map(|l| l.total_size).sum()
    }
}

/// True for the orders the ladder shows: resting, buy-side, non-TWAP, priced.
fn is_ladder_order(order: &Order) -> bool {
    order.kind == OrderKind::Open
        && order.side == OrderSide::Buy
        && !order.is_twap()
        && order.has_valid_price()
}

/// Group resting buy orders into price levels and split the levels,
/// highest price first, into bands of at most `band_size`.
///
/// Expects raw (unclustered) orders so counts are exact. Other kinds and
/// sides in the input are ignored.
pub fn build_ladder(orders: &[Order], tolerance: f64, band_size: usize) -> Vec<LadderBand> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut levels: Vec<LadderLevel> = Vec::new();

    for order in orders.iter().filter(|o| is_ladder_order(o)) {
        let price = order.price_value();
        let Some(key) = relative_price_key(price, tolerance) else {
            continue;
        };
        let size = order.size_value();

        match index.get(&key) {
            Some(&slot) => {
                let level = &mut levels[slot];
                level.order_count += 1;
                level.total_size += size;
                level.order_ids.push(order.id.clone());
            }
            None => {
                index.insert(key, levels.len());
                levels.push(LadderLevel {
                    price,
                    order_count: 1,
                    total_size: size,
                    timestamp: order.timestamp,
                    order_ids: vec![order.id.clone()],
                });
            }
        }
    }

    levels.sort_by(|a, b| b.price.total_cmp(&a.price));

    let bands: Vec<LadderBand> = levels
        .chunks(band_size.max(1))
        .enumerate()
        .map(|(index, chunk)| LadderBand { index, levels: chunk.to_vec() })
        .collect();

    tracing::debug!(levels = levels.len(), bands = bands.len(), "ladder built");
    bands
}
