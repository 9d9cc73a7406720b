//! OrderLens CLI — analyze an account's order snapshot.
//!
//! Commands:
//! - `analyze` — timeline, windows, trades, clustering and ladder summary
//! - `trades` — FIFO-matched trade legs, optionally exported to CSV/JSON
//! - `ladder` — resting buy orders grouped into price bands
//! - `config` — print the default engine config as TOML
//!
//! Logging goes to stderr, filtered by `ORDERLENS_LOG` (default `info`).

mod export;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use orderlens_core::domain::Order;
use orderlens_core::engine::{build_ladder, match_trades, visible_orders, LadderBand};
use orderlens_core::stats::{instruments, OrderFilter, OrderStats, TradeSummary, TwapStats};
use orderlens_core::{
    build_timeline, Analysis, EngineConfig, FixedClock, Normalizer, RawSnapshot, SystemClock,
};
use std::path::{Path, PathBuf};

use crate::export::{export_json, export_trades_csv, AnalysisReport};

#[derive(Parser)]
#[command(
    name = "orderlens",
    about = "OrderLens CLI — order timeline, trade matching and ladder analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full engine over a snapshot and print a summary.
    Analyze {
        /// Snapshot JSON with the raw record lists.
        #[arg(long)]
        input: PathBuf,

        /// Engine config TOML. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Instant substituted for missing timestamps (RFC 3339). Defaults to now.
        #[arg(long)]
        now: Option<String>,

        /// Scope the whole analysis to this instrument.
        #[arg(long)]
        instrument: Option<String>,

        /// Case-insensitive search over the order list.
        #[arg(long)]
        search: Option<String>,

        /// Maximum orders listed.
        #[arg(long, default_value_t = orderlens_core::stats::DEFAULT_ORDER_LIMIT)]
        limit: usize,

        /// Print the full analysis as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Match executed fills into trades.
    Trades {
        /// Snapshot JSON with the raw record lists.
        #[arg(long)]
        input: PathBuf,

        /// Instant substituted for missing timestamps (RFC 3339). Defaults to now.
        #[arg(long)]
        now: Option<String>,

        /// Write trade legs as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write trade legs as JSON to this path.
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Group resting buy orders into ladder bands.
    Ladder {
        /// Snapshot JSON with the raw record lists.
        #[arg(long)]
        input: PathBuf,

        /// Engine config TOML. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Instant substituted for missing timestamps (RFC 3339). Defaults to now.
        #[arg(long)]
        now: Option<String>,

        /// Only include this instrument.
        #[arg(long)]
        instrument: Option<String>,
    },
    /// Print the default engine config as TOML.
    Config,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            now,
            instrument,
            search,
            limit,
            json,
        } => run_analyze(
            &input,
            config.as_deref(),
            now.as_deref(),
            OrderFilter { instrument, search, limit },
            json,
        ),
        Commands::Trades {
            input,
            now,
            csv,
            json_out,
        } => run_trades(&input, now.as_deref(), csv.as_deref(), json_out.as_deref()),
        Commands::Ladder {
            input,
            config,
            now,
            instrument,
        } => run_ladder(&input, config.as_deref(), now.as_deref(), instrument.as_deref()),
        Commands::Config => {
            print!("{}", EngineConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = std::env::var("ORDERLENS_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| anyhow::anyhow!("invalid ORDERLENS_LOG filter: {err}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Load a snapshot and build its timeline. `now` pins the instant used for
/// records without a timestamp.
fn load_timeline(input: &Path, now: Option<&str>) -> Result<Vec<Order>> {
    let snapshot = RawSnapshot::from_file(input)
        .with_context(|| format!("failed to load snapshot {}", input.display()))?;

    let orders = match now {
        Some(raw) => {
            let instant: DateTime<Utc> = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --now '{raw}', expected RFC 3339"))?
                .with_timezone(&Utc);
            build_timeline(&snapshot, &Normalizer::new(FixedClock(instant)))
        }
        None => build_timeline(&snapshot, &Normalizer::new(SystemClock)),
    };
    tracing::info!(records = snapshot.record_count(), orders = orders.len(), "snapshot loaded");
    Ok(orders)
}

fn run_analyze(
    input: &Path,
    config_path: Option<&Path>,
    now: Option<&str>,
    filter: OrderFilter,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let orders = load_timeline(input, now)?;
    let analysis = analyze_orders(&orders, &config, filter.instrument.as_deref())?;

    if json {
        let report = AnalysisReport { config_fingerprint: config.fingerprint(), analysis: &analysis };
        println!("{}", export_json(&report)?);
        return Ok(());
    }

    print_analysis(&orders, &analysis, &filter);
    Ok(())
}

/// Run the engine, scoped to `instrument` when one is given.
fn analyze_orders(
    orders: &[Order],
    config: &EngineConfig,
    instrument: Option<&str>,
) -> Result<Analysis> {
    if let Some(instrument) = instrument {
        if !orders.iter().any(|o| o.instrument == instrument) {
            bail!("instrument '{instrument}' not found in snapshot");
        }
    }
    Ok(Analysis::run_scoped(orders, config, instrument))
}

fn run_trades(
    input: &Path,
    now: Option<&str>,
    csv_path: Option<&Path>,
    json_path: Option<&Path>,
) -> Result<()> {
    let orders = load_timeline(input, now)?;
    let trades = match_trades(&orders);

    let summary = TradeSummary::compute(&trades);
    println!("=== Trades ===");
    println!("Matches:        {}", summary.matches);
    println!("Total PnL:      {:.2}", summary.total_pnl);
    println!("Winners:        {}", summary.winners);
    println!("Losers:         {}", summary.losers);
    println!("Win Rate:       {:.1}%", summary.win_rate * 100.0);
    println!();
    for t in trades.iter().filter(|t| t.is_entry()) {
        println!(
            "{:<8} {:>12.4} @ {:<12.4} -> {:<12.4} pnl {:>12.4} ({:+.2}%)",
            t.instrument, t.matched_size, t.buy_price, t.sell_price, t.pnl, t.pnl_percent
        );
    }

    if let Some(path) = csv_path {
        std::fs::write(path, export_trades_csv(&trades)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Trades CSV saved to: {}", path.display());
    }
    if let Some(path) = json_path {
        std::fs::write(path, export_json(&trades)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Trades JSON saved to: {}", path.display());
    }
    Ok(())
}

fn run_ladder(
    input: &Path,
    config_path: Option<&Path>,
    now: Option<&str>,
    instrument: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let orders = load_timeline(input, now)?;

    let candidates: Vec<Order> = visible_orders(&orders)
        .into_iter()
        .filter(|o| instrument.map_or(true, |i| o.instrument == i))
        .collect();
    let bands = build_ladder(&candidates, config.ladder_price_tolerance, config.ladder_band_size);

    if bands.is_empty() {
        println!("No resting buy orders.");
        return Ok(());
    }
    print_ladder(&bands);
    Ok(())
}

fn print_analysis(orders: &[Order], analysis: &Analysis, filter: &OrderFilter) {
    let stats = OrderStats::compute(&analysis.visible);
    let twap = TwapStats::compute(orders);
    let summary = TradeSummary::compute(&analysis.trades);

    println!();
    println!("=== Order Timeline ===");
    println!("Orders:         {}", orders.len());
    println!("Instruments:    {}", instruments(orders).join(", "));
    println!(
        "Open:           {} ({} buy / {} sell)",
        stats.open, stats.open_buy, stats.open_sell
    );
    println!("TWAP slices:    {} ({} crossed)", twap.total, twap.crossed);
    println!("Visible:        {}", analysis.visible.len());
    println!();
    println!("--- Time Windows ---");
    for (instrument, window) in &analysis.windows {
        println!(
            "{:<10} {} .. {}",
            instrument,
            window.earliest.format("%Y-%m-%d %H:%M:%S"),
            window.latest.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    println!("--- Trades ---");
    println!("Matches:        {}", summary.matches);
    println!("Total PnL:      {:.2}", summary.total_pnl);
    println!("Win Rate:       {:.1}%", summary.win_rate * 100.0);
    println!();
    println!("--- Ladder ---");
    println!("Bands:          {}", analysis.ladder.len());
    println!();
    println!("--- Orders ---");
    for order in filter.apply(&analysis.visible) {
        let marker = if order.is_cluster { format!(" x{}", order.cluster_size) } else { String::new() };
        println!(
            "{} {:<10} {:<4} {:<9} {:>14} {:>12}{}",
            order.timestamp.format("%Y-%m-%d %H:%M:%S"),
            order.instrument,
            order.side,
            order.status(),
            order.price,
            order.size,
            marker
        );
    }
}

fn print_ladder(bands: &[LadderBand]) {
    for band in bands {
        println!(
            "=== Band {} ({} orders, size {:.4}) ===",
            band.index + 1,
            band.order_count(),
            band.total_size()
        );
        for level in &band.levels {
            println!(
                "{:>14.4}  {:>4} orders  size {:>12.4}",
                level.price, level.order_count, level.total_size
            );
        }
    }
}
