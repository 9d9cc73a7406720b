//! Record normalizer — maps each venue record shape onto the canonical [`Order`].
//!
//! One adapter per source kind. Adapters never reject a record: missing
//! numbers become `"0"`, a missing instrument becomes `"Unknown"`, a missing
//! timestamp becomes the clock's "now", and a missing `oid` is replaced by a
//! content hash of the record.

use super::raw::{Fields, RawRecord};
use crate::clock::{Clock, SystemClock};
use crate::domain::{
    parse_decimal, CancelDetails, Order, OrderId, OrderKind, OrderSide, TwapDetails,
    UNKNOWN_INSTRUMENT,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ZERO: &str = "0";

/// Venue stream a raw record was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Open,
    /// Open orders with extra frontend detail; same field layout as `Open`.
    FrontendOpen,
    Fill,
    /// May wrap the fill fields in a `fill` sub-object.
    TwapSliceFill,
    /// May wrap the order fields in an `order` sub-object.
    Cancelled,
}

impl SourceKind {
    pub fn order_kind(&self) -> OrderKind {
        match self {
            SourceKind::Open | SourceKind::FrontendOpen => OrderKind::Open,
            SourceKind::Fill => OrderKind::Executed,
            SourceKind::TwapSliceFill => OrderKind::Twap,
            SourceKind::Cancelled => OrderKind::Cancelled,
        }
    }
}

/// Field names for the core attributes of one record shape.
struct Layout {
    price: &'static [&'static str],
    size: &'static [&'static str],
    time: &'static str,
}

const OPEN_LAYOUT: Layout = Layout { price: &["limitPx"], size: &["sz"], time: "timestamp" };
const FILL_LAYOUT: Layout = Layout { price: &["px"], size: &["sz"], time: "time" };
const CANCELLED_LAYOUT: Layout =
    Layout { price: &["limitPx", "price"], size: &["sz", "size"], time: "timestamp" };

/// Converts raw records into canonical orders.
#[derive(Debug, Clone)]
pub struct Normalizer<C: Clock = SystemClock> {
    clock: C,
}

impl Normalizer<SystemClock> {
    /// Normalizer that stamps missing timestamps with wall-clock time.
    pub fn system() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for Normalizer<SystemClock> {
    fn default() -> Self {
        Self::system()
    }
}

impl<C: Clock> Normalizer<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Normalize one record, treated as the first of its source list.
    pub fn normalize(&self, kind: SourceKind, raw: &RawRecord) -> Order {
        normalize_at(kind, raw, 0, self.clock.now())
    }

    /// Normalize a batch from one source. Output is one-to-one with input;
    /// every record in the batch shares the same substituted "now". Records
    /// without an `oid` are identified by content and position.
    pub fn normalize_all(&self, kind: SourceKind, raws: &[RawRecord]) -> Vec<Order> {
        let _span = tracing::debug_span!("normalize", source = ?kind, records = raws.len()).entered();
        let now = self.clock.now();
        let orders: Vec<Order> = raws
            .iter()
            .enumerate()
            .map(|(position, raw)| normalize_at(kind, raw, position, now))
            .collect();

        let unknown = orders.iter().filter(|o| o.instrument == UNKNOWN_INSTRUMENT).count();
        if unknown > 0 {
            tracing::warn!(source = ?kind, unknown, "records without an instrument");
        }
        let negative_unfilled = orders
            .iter()
            .filter_map(|o| o.cancellation.as_ref())
            .filter(|c| c.unfilled_size < 0.0)
            .count();
        if negative_unfilled > 0 {
            tracing::warn!(negative_unfilled, "cancelled orders with filled size above original size");
        }
        tracing::debug!(source = ?kind, orders = orders.len(), "normalized");
        orders
    }
}

fn normalize_at(kind: SourceKind, raw: &RawRecord, position: usize, now: DateTime<Utc>) -> Order {
    match kind {
        SourceKind::Open | SourceKind::FrontendOpen => open_order(raw, position, now),
        SourceKind::Fill => executed_order(raw, position, now),
        SourceKind::TwapSliceFill => twap_order(raw, position, now),
        SourceKind::Cancelled => cancelled_order(raw, position, now),
    }
}

fn open_order(raw: &RawRecord, position: usize, now: DateTime<Utc>) -> Order {
    base_order(OrderKind::Open, raw.fields(), &OPEN_LAYOUT, position, now)
}

fn executed_order(raw: &RawRecord, position: usize, now: DateTime<Utc>) -> Order {
    base_order(OrderKind::Executed, raw.fields(), &FILL_LAYOUT, position, now)
}

fn twap_order(raw: &RawRecord, position: usize, now: DateTime<Utc>) -> Order {
    let fill = raw.unwrap_nested("fill");
    let mut order = base_order(OrderKind::Twap, fill, &FILL_LAYOUT, position, now);
    order.twap = Some(TwapDetails {
        direction: fill.text("dir").unwrap_or_else(|| "Unknown".into()),
        crossed: fill.flag("crossed"),
        fee: fill.text("fee").unwrap_or_else(|| ZERO.into()),
        fee_token: fill.text("feeToken").unwrap_or_else(|| "USDC".into()),
        hash: fill.text("hash").unwrap_or_default(),
        tid: fill.text("tid"),
        start_position: fill.text("startPosition").unwrap_or_else(|| ZERO.into()),
        closed_pnl: fill.text("closedPnl").unwrap_or_else(|| ZERO.into()),
        // The TWAP id sits on the wrapper, not on the inner fill.
        twap_id: raw.fields().text("twapId"),
    });
    order
}

fn cancelled_order(raw: &RawRecord, position: usize, now: DateTime<Utc>) -> Order {
    let fields = raw.unwrap_nested("order");
    let mut order = base_order(OrderKind::Cancelled, fields, &CANCELLED_LAYOUT, position, now);

    let original_size =
        fields.first_text(&["originalSz", "originalSize", "sz"]).unwrap_or_else(|| ZERO.into());
    let filled_size = fields.first_text(&["filledSz", "filledSize"]).unwrap_or_else(|| ZERO.into());
    let cancelled_size =
        fields.first_text(&["cancelledSz", "cancelledSize"]).unwrap_or_else(|| ZERO.into());
    let unfilled_size = parse_decimal(&original_size) - parse_decimal(&filled_size);

    order.cancellation =
        Some(CancelDetails { original_size, filled_size, cancelled_size, unfilled_size });
    order
}

fn base_order(
    kind: OrderKind,
    fields: Fields<'_>,
    layout: &Layout,
    position: usize,
    now: DateTime<Utc>,
) -> Order {
    let prefix = kind.id_prefix();
    let venue_oid = fields.text("oid");
    let id = match &venue_oid {
        Some(oid) => OrderId::from_venue(prefix, oid),
        None => OrderId::from_content(prefix, &fields.canonical_bytes(), position),
    };

    Order {
        id,
        order_id: venue_oid.unwrap_or_default(),
        instrument: fields.text("coin").unwrap_or_else(|| UNKNOWN_INSTRUMENT.into()),
        side: OrderSide::from_venue_code(fields.text("side").as_deref()),
        size: fields.first_text(layout.size).unwrap_or_else(|| ZERO.into()),
        price: fields.first_text(layout.price).unwrap_or_else(|| ZERO.into()),
        kind,
        timestamp: fields.instant(layout.time).unwrap_or(now),
        reduce_only: false,
        twap: None,
        cancellation: None,
        cluster_size: 1,
        is_cluster: false,
    }
}
