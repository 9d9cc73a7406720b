//! Display clustering — collapses dense order sets into synthetic cluster orders.
//!
//! Lossy. Output is for rendering only and must never be fed to the matcher.

use super::quantize::{relative_price_key, time_bucket};
use crate::config::EngineConfig;
use crate::domain::{Order, OrderKind, OrderSide};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

/// Composite bucket key: (price key, time bucket, side, kind).
type ClusterKey = (Option<i64>, i64, OrderSide, OrderKind);

/// Collapse `orders` into clusters when there are more than
/// `config.cluster_threshold` of them.
///
/// At or below the threshold the input is returned unchanged. Above it,
/// non-TWAP orders are bucketed by relative price, time bucket, side and
/// kind; each bucket becomes one order carrying the members' mean price and
/// mean timestamp, with every other field taken from the first member.
/// Clusters come out in order of first appearance, followed by the TWAP
/// orders untouched.
pub fn cluster_orders(orders: &[Order], config: &EngineConfig) -> Vec<Order> {
    if orders.len() <= config.cluster_threshold {
        return orders.to_vec();
    }
    let _span = tracing::debug_span!("cluster_orders", orders = orders.len()).entered();

    let mut index: HashMap<ClusterKey, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&Order>> = Vec::new();
    let mut twaps: Vec<Order> = Vec::new();

    for order in orders {
        if order.is_twap() {
            twaps.push(order.clone());
            continue;
        }
        let key = (
            relative_price_key(order.price_value(), config.cluster_price_tolerance),
            time_bucket(order.timestamp, config.cluster_time_bucket_secs),
            order.side,
            order.kind,
        );
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(order);
    }

    let mut clustered: Vec<Order> = buckets.iter().filter_map(|m| collapse(m)).collect();
    tracing::debug!(
        clusters = clustered.len(),
        twap = twaps.len(),
        "orders clustered"
    );
    clustered.extend(twaps);
    clustered
}

/// Merge one bucket into a single order. `None` only for an empty bucket.
fn collapse(members: &[&Order]) -> Option<Order> {
    let first = *members.first()?;
    let n = members.len();

    let mean_price = members.iter().map(|o| o.price_value()).sum::<f64>() / n as f64;
    let mean_millis =
        members.iter().map(|o| i128::from(o.timestamp.timestamp_millis())).sum::<i128>() as f64
            / n as f64;

    let mut cluster = first.clone();
    cluster.price = mean_price.to_string();
    cluster.timestamp = Utc
        .timestamp_millis_opt(mean_millis.round() as i64)
        .single()
        .unwrap_or(first.timestamp);
    cluster.cluster_size = n;
    cluster.is_cluster = n > 1;
    Some(cluster)
}
