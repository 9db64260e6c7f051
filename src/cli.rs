//! Command-line interface definitions for Trend Archive.
//!
//! Every option is optional; unset options fall back to the config file (if
//! any) and then to built-in defaults. Most options can also be set through
//! environment variables, which is how scheduled jobs usually configure it.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Trend Archive application.
///
/// # Examples
///
/// ```sh
/// # Defaults: Poland, 20 items, ./data
/// trend_archive
///
/// # Different country and output directory
/// trend_archive --geo DE --source-label "google-trends(DE)" -o ./docs/data
///
/// # Cap the list through the environment
/// TRENDS_MAX_ITEMS=10 trend_archive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "TRENDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory for the dated reports and the index file
    #[arg(short, long, env = "TRENDS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of trends written to a report
    #[arg(short = 'n', long, env = "TRENDS_MAX_ITEMS")]
    pub max_items: Option<usize>,

    /// Source name recorded in the index and the report title
    #[arg(long, env = "TRENDS_SOURCE_LABEL")]
    pub source_label: Option<String>,

    /// Index filename inside the output directory
    #[arg(long)]
    pub index_file: Option<String>,

    /// Country code passed to Google Trends
    #[arg(long, env = "TRENDS_GEO")]
    pub geo: Option<String>,

    /// Interface language for the JSON endpoint
    #[arg(long)]
    pub language: Option<String>,
}
