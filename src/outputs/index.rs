//! The rolling `index.json` catalog of every run.
//!
//! The index is a pretty-printed JSON array of [`ReportRecord`], one per date,
//! newest first:
//!
//! ```json
//! [
//!   { "date": "2025-08-21", "source": "google-trends(PL)", "count": 20, "file": "2025-08-21.md" },
//!   { "date": "2025-08-20", "source": "google-trends(PL)", "count": 0, "file": "2025-08-20.md" }
//! ]
//! ```
//!
//! # Replace vs Append
//!
//! A rerun on the same date replaces that date's record. Loading never fails:
//! a missing or corrupt file is treated as an empty index so the daily run
//! keeps going.

use crate::models::{RecordFields, ReportRecord};
use crate::utils::atomic_write;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Load the index at `path`, falling back to an empty one.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Vec<ReportRecord> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No index yet; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to read index; starting from an empty list");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<ReportRecord>>(&raw) {
        Ok(records) => {
            debug!(count = records.len(), "Loaded index");
            records
        }
        Err(e) => {
            warn!(error = %e, "Index is not a valid record list; starting from an empty list");
            Vec::new()
        }
    }
}

/// Upsert the record for `date_key` and restore newest-first order.
///
/// Dates are zero-padded `YYYY-MM-DD`, so comparing them as strings orders
/// them chronologically.
pub fn reconcile(
    mut existing: Vec<ReportRecord>,
    date_key: &str,
    fields: RecordFields,
) -> Vec<ReportRecord> {
    existing.retain(|r| r.date != date_key);
    existing.push(ReportRecord::new(date_key, fields));
    existing.sort_by(|a, b| b.date.cmp(&a.date));
    existing
}

/// Persist the index as pretty-printed JSON, replacing the file atomically.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = index.len()))]
pub async fn save(path: &Path, index: &[ReportRecord]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(index)?;
    atomic_write(path, json.as_bytes()).await?;
    info!("Wrote index");
    Ok(())
}
