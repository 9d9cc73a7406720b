//! Per-instrument time windows.

use crate::domain::{Order, TimeWindow};
use chrono::Duration;
use std::collections::BTreeMap;

/// Fold orders into the span of timestamps each instrument covers, then
/// widen every span by `padding` on both sides.
///
/// Pure: the same orders always give the same windows.
pub fn compute_time_windows(orders: &[Order], padding: Duration) -> BTreeMap<String, TimeWindow> {
    let mut windows: BTreeMap<String, TimeWindow> = BTreeMap::new();

    for order in orders {
        windows
            .entry(order.instrument.clone())
            .and_modify(|w| w.include(order.timestamp))
            .or_insert_with(|| TimeWindow::at(order.timestamp));
    }

    for window in windows.values_mut() {
        *window = window.padded(padding);
    }

    tracing::debug!(instruments = windows.len(), "time windows computed");
    windows
}
