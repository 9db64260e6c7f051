//! Dated Markdown report generation.
//!
//! One report per date, named `{date_key}.md`:
//!
//! ```text
//! # 2025-08-20 - google-trends(PL) snapshot
//!
//! - Legia Warszawa
//! - pogoda
//! ```
//!
//! An empty trend list produces the [`NO_DATA_MARKER`] line instead of the
//! bullets. Reports are replaced atomically, so a rerun on the same day
//! overwrites the earlier file and readers never see a partial one.

use crate::utils::atomic_write;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Line written in place of the list when no trends were found.
pub const NO_DATA_MARKER: &str = "_no data_";

/// Report filename for a date key.
pub fn report_filename(date_key: &str) -> String {
    format!("{date_key}.md")
}

/// Render a report to Markdown.
pub fn render(date_key: &str, source_label: &str, trends: &[String]) -> String {
    let mut md = String::new();
    writeln!(md, "# {date_key} - {source_label} snapshot").unwrap();
    writeln!(md).unwrap();

    if trends.is_empty() {
        writeln!(md, "{NO_DATA_MARKER}").unwrap();
    } else {
        for trend in trends {
            writeln!(md, "- {trend}").unwrap();
        }
    }
    md
}

/// Write the report for `date_key` into `output_dir` and return its path.
///
/// # Errors
///
/// Any filesystem error is returned; the caller treats it as fatal.
#[instrument(level = "info", skip_all, fields(dir = %output_dir.display(), date = %date_key, count = trends.len()))]
pub async fn write(
    output_dir: &Path,
    date_key: &str,
    source_label: &str,
    trends: &[String],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(report_filename(date_key));
    let md = render(date_key, source_label, trends);
    atomic_write(&path, md.as_bytes()).await?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(path)
}
