//! Raw snapshot — every record list retrieved for one account, and the
//! assembly of those lists into a single timeline.

use super::normalize::{Normalizer, SourceKind};
use super::raw::RawRecord;
use crate::clock::Clock;
use crate::domain::Order;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Already-retrieved venue records, one list per source. Missing lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSnapshot {
    pub open_orders: Vec<RawRecord>,
    pub frontend_open_orders: Vec<RawRecord>,
    pub fills: Vec<RawRecord>,
    pub twap_slice_fills: Vec<RawRecord>,
    pub cancelled_orders: Vec<RawRecord>,
    /// General order history; only consulted when `cancelled_orders` is empty.
    pub order_history: Vec<RawRecord>,
}

impl RawSnapshot {
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SnapshotError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Open orders to use: frontend-detailed ones replace the plain list
    /// whenever there are any.
    pub fn effective_open_orders(&self) -> (SourceKind, &[RawRecord]) {
        if self.frontend_open_orders.is_empty() {
            (SourceKind::Open, self.open_orders.as_slice())
        } else {
            (SourceKind::FrontendOpen, self.frontend_open_orders.as_slice())
        }
    }

    /// Cancelled records to use. Falls back to cancelled entries of the
    /// order history when the dedicated list is empty.
    pub fn effective_cancelled_orders(&self) -> Vec<RawRecord> {
        if !self.cancelled_orders.is_empty() {
            return self.cancelled_orders.clone();
        }
        let fallback: Vec<RawRecord> =
            self.order_history.iter().filter(|r| is_cancelled_entry(r)).cloned().collect();
        if !fallback.is_empty() {
            tracing::debug!(
                history = self.order_history.len(),
                cancelled = fallback.len(),
                "using order history for cancelled orders"
            );
        }
        fallback
    }

    pub fn record_count(&self) -> usize {
        self.open_orders.len()
            + self.frontend_open_orders.len()
            + self.fills.len()
            + self.twap_slice_fills.len()
            + self.cancelled_orders.len()
            + self.order_history.len()
    }
}

fn is_cancelled_entry(record: &RawRecord) -> bool {
    let fields = record.fields();
    matches!(fields.text("status").as_deref(), Some("cancelled") | Some("canceled"))
        || fields.flag("cancelled")
}

/// Normalize every source of `snapshot` and merge into one list, newest first.
///
/// Ties keep source order: open, executed, TWAP, cancelled.
pub fn build_timeline<C: Clock>(snapshot: &RawSnapshot, normalizer: &Normalizer<C>) -> Vec<Order> {
    let _span = tracing::debug_span!("build_timeline", records = snapshot.record_count()).entered();

    let (open_kind, open_records) = snapshot.effective_open_orders();
    let cancelled_records = snapshot.effective_cancelled_orders();

    let mut orders = normalizer.normalize_all(open_kind, open_records);
    orders.extend(normalizer.normalize_all(SourceKind::Fill, &snapshot.fills));
    orders.extend(normalizer.normalize_all(SourceKind::TwapSliceFill, &snapshot.twap_slice_fills));
    orders.extend(normalizer.normalize_all(SourceKind::Cancelled, &cancelled_records));

    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    tracing::info!(orders = orders.len(), "timeline built");
    orders
}
