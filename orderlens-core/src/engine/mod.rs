//! Analytics engine — pure transformations over canonical orders.
//!
//! Every stage is a synchronous function of its input and the engine config:
//!
//! 1. Time windows: per-instrument span of activity, padded
//! 2. Trade matching: FIFO pairing of executed buys and sells
//! 3. Clustering: lossy reduction of dense order sets for display
//! 4. Ladder: resting buy orders grouped into price levels and bands
//!
//! Stages keep no state between calls and may be re-run on every refresh.

pub mod cluster;
pub mod ladder;
pub mod matcher;
pub mod quantize;
pub mod time_window;

pub use cluster::cluster_orders;
pub use ladder::{build_ladder, LadderBand, LadderLevel};
pub use matcher::match_trades;
pub use quantize::{relative_price_key, time_bucket};
pub use time_window::compute_time_windows;

use crate::config::EngineConfig;
use crate::domain::{Order, TimeWindow, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Orders that can be drawn: TWAP orders always, everything else only with a
/// finite positive price.
pub fn visible_orders(orders: &[Order]) -> Vec<Order> {
    let visible: Vec<Order> =
        orders.iter().filter(|o| o.is_twap() || o.has_valid_price()).cloned().collect();
    let dropped = orders.len() - visible.len();
    if dropped > 0 {
        tracing::debug!(dropped, "orders without a usable price hidden");
    }
    visible
}

/// Output of one full engine pass over a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub windows: BTreeMap<String, TimeWindow>,
    pub trades: Vec<Trade>,
    /// Visible orders after clustering. Display only.
    pub visible: Vec<Order>,
    pub ladder: Vec<LadderBand>,
}

impl Analysis {
    /// Run every stage. Windows and trades see all orders; clustering and
    /// the ladder see only visible ones, and the ladder is built from the
    /// unclustered set.
    pub fn run(orders: &[Order], config: &EngineConfig) -> Self {
        let _span = tracing::info_span!("analysis", orders = orders.len()).entered();

        let windows = compute_time_windows(orders, config.window_padding());
        let trades = match_trades(orders);
        let candidates = visible_orders(orders);
        let ladder =
            build_ladder(&candidates, config.ladder_price_tolerance, config.ladder_band_size);
        let visible = cluster_orders(&candidates, config);

        tracing::info!(
            instruments = windows.len(),
            trades = trades.len(),
            visible = visible.len(),
            bands = ladder.len(),
            "analysis complete"
        );
        Self { windows, trades, visible, ladder }
    }

    /// Like [`Analysis::run`], but every stage sees only `instrument`'s
    /// orders when one is given. Trade IDs are positional within the scoped
    /// pass.
    pub fn run_scoped(orders: &[Order], config: &EngineConfig, instrument: Option<&str>) -> Self {
        match instrument {
            Some(instrument) => {
                let scoped: Vec<Order> =
                    orders.iter().filter(|o| o.instrument == instrument).cloned().collect();
                tracing::debug!(instrument, orders = scoped.len(), "analysis scoped to instrument");
                Self::run(&scoped, config)
            }
            None => Self::run(orders, config),
        }
    }
}
