//! One end-to-end run: resolve, write the report, reconcile the index.
//!
//! Everything here happens sequentially on the calling task. Only filesystem
//! failures abort a run; an upstream outage just produces an empty report.

use crate::config::Config;
use crate::models::RecordFields;
use crate::outputs::{index, report};
use crate::resolver::resolve;
use crate::sources::TrendStrategy;
use crate::utils::{ensure_writable_dir, run_clock};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a completed run produced, for the closing log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub date_key: String,
    /// Winning strategy label, or `"none"`.
    pub strategy: String,
    pub count: usize,
    pub report_path: PathBuf,
    pub index_path: PathBuf,
    /// Number of records in the index after this run.
    pub index_len: usize,
}

#[instrument(level = "info", skip_all, fields(dir = %config.output_directory.display()))]
pub async fn run<S>(
    config: &Config,
    strategies: &[S],
    now: DateTime<Utc>,
) -> Result<RunSummary, Box<dyn Error>>
where
    S: TrendStrategy,
{
    let clock = run_clock(now);
    info!("== {} ==", clock.human);

    ensure_writable_dir(&config.output_directory).await?;

    // 1) Resolve trends
    let resolution = resolve(strategies, config.max_items).await;
    let count = resolution.trends.len();
    info!(
        count,
        source = %config.source_label,
        strategy = %resolution.source,
        "Fetched {} trends from {}",
        count,
        config.source_label
    );
    if resolution.is_empty() {
        warn!("No trends available today; writing an empty report");
    }

    // 2) Write the report
    let report_path = report::write(
        &config.output_directory,
        &clock.date_key,
        &config.source_label,
        &resolution.trends,
    )
    .await?;

    // 3) Reconcile the index
    let index_path = config.index_path();
    let existing = index::load(&index_path).await;
    let updated = index::reconcile(
        existing,
        &clock.date_key,
        RecordFields {
            source: config.source_label.clone(),
            count,
            file: report::report_filename(&clock.date_key),
        },
    );
    index::save(&index_path, &updated).await?;
    info!(path = %index_path.display(), n = updated.len(), "Updated index");

    Ok(RunSummary {
        date_key: clock.date_key,
        strategy: resolution.source,
        count,
        report_path,
        index_path,
        index_len: updated.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportRecord;
    use crate::outputs::report::NO_DATA_MARKER;
    use crate::sources::testing::Scripted;
    use chrono::TimeZone;

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            output_directory: dir.to_path_buf(),
            max_items: 3,
            ..Config::default()
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, day, 6, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_run_with_all_strategies_failing_completes() {
        let td = tempfile::TempDir::new().unwrap();
        let config = config_in(td.path());
        let strategies = vec![Scripted::failing("a"), Scripted::failing("b")];

        let summary = run(&config, &strategies, at(20)).await.unwrap();

        assert_eq!(summary.strategy, "none");
        assert_eq!(summary.count, 0);
        let md = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(md.lines().any(|l| l == NO_DATA_MARKER));

        let records = index::load(&summary.index_path).await;
        assert_eq!(
            records,
            vec![ReportRecord {
                date: "2025-08-20".to_string(),
                source: "google-trends(PL)".to_string(),
                count: 0,
                file: "2025-08-20.md".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_run_writes_truncated_report() {
        let td = tempfile::TempDir::new().unwrap();
        let config = config_in(td.path());
        let strategies = vec![Scripted::ok("a", vec!["1", "2", "2", "3", "4"])];

        let summary = run(&config, &strategies, at(20)).await.unwrap();

        assert_eq!(summary.strategy, "a");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.report_path, td.path().join("2025-08-20.md"));
        let md = std::fs::read_to_string(&summary.report_path).unwrap();
        let bullets: Vec<&str> = md.lines().filter_map(|l| l.strip_prefix("- ")).collect();
        assert_eq!(bullets, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_rerun_same_day_overwrites_record() {
        let td = tempfile::TempDir::new().unwrap();
        let config = config_in(td.path());

        run(&config, &[Scripted::failing("a")], at(20)).await.unwrap();
        let summary = run(&config, &[Scripted::ok("a", vec!["x"])], at(20))
            .await
            .unwrap();

        assert_eq!(summary.index_len, 1);
        let records = index::load(&summary.index_path).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 1);
    }

    #[tokio::test]
    async fn test_consecutive_days_newest_first() {
        let td = tempfile::TempDir::new().unwrap();
        let config = config_in(td.path());
        let strategies = vec![Scripted::ok("a", vec!["x"])];

        run(&config, &strategies, at(20)).await.unwrap();
        let summary = run(&config, &strategies, at(21)).await.unwrap();

        let records = index::load(&summary.index_path).await;
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-21", "2025-08-20"]);
    }

    #[tokio::test]
    async fn test_run_recovers_from_corrupt_index() {
        let td = tempfile::TempDir::new().unwrap();
        let config = config_in(td.path());
        std::fs::write(config.index_path(), "not json").unwrap();

        let summary = run(&config, &[Scripted::ok("a", vec!["x"])], at(20))
            .await
            .unwrap();
        assert_eq!(summary.index_len, 1);
    }

    #[tokio::test]
    async fn test_run_fails_when_output_dir_is_a_file() {
        let td = tempfile::TempDir::new().unwrap();
        let file = td.path().join("data");
        std::fs::write(&file, "").unwrap();
        let config = config_in(&file);

        assert!(run(&config, &[Scripted::ok("a", vec!["x"])], at(20)).await.is_err());
    }
}
