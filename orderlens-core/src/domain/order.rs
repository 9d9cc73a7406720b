//! Canonical order representation shared by every engine stage.

use super::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Venue side code: `"A"` (ask) is a sell, every other code is a buy.
    pub fn from_venue_code(code: Option<&str>) -> Self {
        match code {
            Some("A") => OrderSide::Sell,
            _ => OrderSide::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which record stream an order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Resting order on the book.
    Open,
    /// Executed fill.
    Executed,
    /// TWAP slice fill.
    Twap,
    Cancelled,
}

impl OrderKind {
    /// Prefix used to namespace canonical order IDs.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            OrderKind::Open => "open",
            OrderKind::Executed => "executed",
            OrderKind::Twap => "twap",
            OrderKind::Cancelled => "cancelled",
        }
    }

    pub fn status(&self) -> OrderStatus {
        match self {
            OrderKind::Open => OrderStatus::Pending,
            OrderKind::Executed | OrderKind::Twap => OrderStatus::Filled,
            OrderKind::Cancelled => OrderStatus::Cancelled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.id_prefix()
    }
}

/// Display status, derived from [`OrderKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Extra attributes carried by TWAP slice fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwapDetails {
    pub direction: String,
    pub crossed: bool,
    pub fee: String,
    pub fee_token: String,
    pub hash: String,
    pub tid: Option<String>,
    pub start_position: String,
    pub closed_pnl: String,
    pub twap_id: Option<String>,
}

/// Size breakdown carried by cancelled orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelDetails {
    pub original_size: String,
    pub filled_size: String,
    pub cancelled_size: String,
    /// `original_size - filled_size`. Negative values are a data-quality
    /// signal from the venue and are kept as-is.
    pub unfilled_size: f64,
}

impl CancelDetails {
    pub fn has_unfilled(&self) -> bool {
        self.unfilled_size > 0.0
    }
}

/// A canonical order. Built once by the normalizer and never mutated;
/// clustering produces new `Order` values rather than editing members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The venue's order number as received (empty when absent).
    pub order_id: String,
    pub instrument: String,
    pub side: OrderSide,
    /// Decimal string from the source, parsed on demand.
    pub size: String,
    /// Decimal string from the source, parsed on demand.
    pub price: String,
    pub kind: OrderKind,
    pub timestamp: DateTime<Utc>,
    pub reduce_only: bool,
    pub twap: Option<TwapDetails>,
    pub cancellation: Option<CancelDetails>,
    /// Number of original orders this record represents (1 unless clustered).
    pub cluster_size: usize,
    pub is_cluster: bool,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        self.kind.status()
    }

    pub fn is_twap(&self) -> bool {
        self.kind == OrderKind::Twap
    }

    /// Parsed price; NaN when the source string is not a number.
    pub fn price_value(&self) -> f64 {
        parse_decimal(&self.price)
    }

    /// Parsed size; NaN when the source string is not a number.
    pub fn size_value(&self) -> f64 {
        parse_decimal(&self.size)
    }

    /// True when the price is a finite, strictly positive number.
    pub fn has_valid_price(&self) -> bool {
        let price = self.price_value();
        price.is_finite() && price > 0.0
    }
}

/// Parse a venue decimal string. Never fails: garbage becomes NaN.
pub fn parse_decimal(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
