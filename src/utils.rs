//! Utility functions for run timestamps, log formatting and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Date key and human timestamp for a run
//! - String truncation for logging upstream responses
//! - File system validation for the output directory
//! - Atomic file replacement for reports and the index

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// The two renderings of a run's wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunClock {
    /// `YYYY-MM-DD`, used as the report filename and index key.
    pub date_key: String,
    /// `YYYY-MM-DD HH:MM:SS UTC`, used in the console header.
    pub human: String,
}

/// Format a UTC instant into a [`RunClock`].
///
/// Dates are computed in UTC, independent of the host timezone.
pub fn run_clock(now: DateTime<Utc>) -> RunClock {
    RunClock {
        date_key: now.format("%Y-%m-%d").to_string(),
        human: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a char boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

/// Sibling temporary path used while a file is being replaced.
fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

/// Replace `target` with `contents` without exposing a half-written file.
///
/// The bytes go to a hidden temp file in the same directory, which is then
/// renamed over the target. A failed write removes the temp file.
#[instrument(level = "debug", skip_all, fields(path = %target.display(), bytes = contents.len()))]
pub async fn atomic_write(target: &Path, contents: &[u8]) -> Result<(), Box<dyn Error>> {
    let tmp = temp_path_for(target);
    if let Err(e) = fs::write(&tmp, contents).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Box::new(e));
    }
    if let Err(e) = fs::rename(&tmp, target).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(Box::new(e));
    }
    debug!("Replaced file atomically");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_clock_formats() {
        let now = Utc.with_ymd_and_hms(2025, 8, 20, 6, 5, 9).unwrap();
        let clock = run_clock(now);
        assert_eq!(clock.date_key, "2025-08-20");
        assert_eq!(clock.human, "2025-08-20 06:05:09 UTC");
    }

    #[test]
    fn test_run_clock_zero_pads() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(run_clock(now).date_key, "2026-01-02");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // "ż" is two bytes; cutting at 1 must back off to 0
        let result = truncate_for_log("żółw", 1);
        assert!(result.starts_with('…'));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let td = tempfile::TempDir::new().unwrap();
        let nested = td.path().join("a/b/data");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }

    #[tokio::test]
    async fn test_atomic_write_replaces_and_cleans_up() {
        let td = tempfile::TempDir::new().unwrap();
        let target = td.path().join("index.json");

        atomic_write(&target, b"first").await.unwrap();
        atomic_write(&target, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(td.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_atomic_write_missing_dir_fails() {
        let td = tempfile::TempDir::new().unwrap();
        let target = td.path().join("missing/index.json");
        assert!(atomic_write(&target, b"x").await.is_err());
    }
}
