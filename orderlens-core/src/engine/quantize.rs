//! Bucket keys shared by clustering and ladder grouping.

use chrono::{DateTime, Utc};

/// Log-relative price bucket: prices within roughly `tolerance` of each
/// other (as a fraction) share a key. `None` for non-finite or
/// non-positive prices.
pub fn relative_price_key(price: f64, tolerance: f64) -> Option<i64> {
    if !(price.is_finite() && price > 0.0) {
        return None;
    }
    Some((price.ln() / tolerance.ln_1p()).round() as i64)
}

/// Fixed-width time bucket over epoch seconds, floored toward −∞.
pub fn time_bucket(timestamp: DateTime<Utc>, bucket_secs: i64) -> i64 {
    timestamp.timestamp().div_euclid(bucket_secs.max(1))
}
