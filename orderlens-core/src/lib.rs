//! OrderLens Core — order normalization, trade matching and display grouping.
//!
//! This crate turns already-retrieved venue records into analysis output:
//! - Domain types (orders, trades, time windows, identifiers)
//! - Raw-record ingestion: per-source adapters into one canonical `Order`
//! - Per-instrument time windows
//! - FIFO trade matcher producing entry/exit legs with P&L
//! - Display clustering and the open-buy price ladder
//! - Timeline filters and summary statistics
//!
//! Every stage is synchronous and pure given its input, its config and the
//! injected clock.

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::Analysis;
pub use ingest::{build_timeline, Normalizer, RawRecord, RawSnapshot, SnapshotError, SourceKind};
