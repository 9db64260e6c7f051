//! # Trend Archive
//!
//! A daily snapshot of the Google Trends "trending searches" for one country
//! (Poland by default), kept as a directory of dated Markdown reports plus a
//! JSON index that a static site can list.
//!
//! ## Usage
//!
//! ```sh
//! trend_archive -o ./data
//! ```
//!
//! ## Architecture
//!
//! Each invocation is one short, single-threaded batch run:
//! 1. **Resolving**: Try each Google Trends endpoint in priority order, with
//!    retries, until one returns trends
//! 2. **Reporting**: Write `{date}.md` with the trends, or a no-data marker
//! 3. **Indexing**: Upsert today's record into `index.json`, newest first
//!
//! The process exits 0 whenever the run completes, including days with no
//! data. Only filesystem and configuration errors end it with a failure.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod resolver;
mod sources;
mod utils;

use cli::Cli;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trend_archive starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };
    info!(
        geo = %config.geo,
        max_items = config.max_items,
        dir = %config.output_directory.display(),
        "Configuration resolved"
    );

    let strategies = sources::google::default_strategies(&config)?;

    let summary = match pipeline::run(&config, &strategies, Utc::now()).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Run aborted");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        strategy = %summary.strategy,
        index_records = summary.index_len,
        "[OK] {}: saved {} trends -> {} + {}",
        summary.date_key,
        summary.count,
        summary.report_path.display(),
        summary.index_path.display()
    );

    Ok(())
}
