//! Domain types for orderlens

pub mod ids;
pub mod order;
pub mod trade;
pub mod window;

pub use ids::{OrderId, TradeId};
pub use order::{
    parse_decimal, CancelDetails, Order, OrderKind, OrderSide, OrderStatus, TwapDetails,
};
pub use trade::{Trade, TradeLeg};
pub use window::TimeWindow;

/// Instrument symbol used when a source record has none.
pub const UNKNOWN_INSTRUMENT: &str = "Unknown";
