//! Data models shared by the resolver, the report writer and the index.
//!
//! - [`Resolution`]: the trend list a run settled on, plus which strategy produced it
//! - [`ReportRecord`]: one entry of the persisted `index.json`, one per calendar date
//! - [`RecordFields`]: the per-run values of a record, before it is keyed by date

use serde::{Deserialize, Serialize};

/// Source label used when every strategy came back empty.
pub const NO_SOURCE: &str = "none";

/// The outcome of resolving trends for a single run.
///
/// `trends` is already trimmed, deduplicated and truncated; `source` names the
/// winning strategy, or [`NO_SOURCE`] when nothing was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Trend names in rank order.
    pub trends: Vec<String>,
    /// Label of the strategy that produced `trends`.
    pub source: String,
}

impl Resolution {
    /// The empty result returned when all strategies are exhausted.
    pub fn none() -> Self {
        Self {
            trends: Vec::new(),
            source: NO_SOURCE.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// One run summary as stored in the index file.
///
/// Records are keyed by `date` (`YYYY-MM-DD`); the index never holds two
/// records with the same date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportRecord {
    /// The run date in `YYYY-MM-DD` format.
    pub date: String,
    /// Human-readable label of the data source.
    pub source: String,
    /// Number of trends written to the report.
    pub count: usize,
    /// Report filename, relative to the output directory.
    pub file: String,
}

/// Everything in a [`ReportRecord`] except its date key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub source: String,
    pub count: usize,
    pub file: String,
}

impl ReportRecord {
    pub fn new(date_key: &str, fields: RecordFields) -> Self {
        Self {
            date: date_key.to_string(),
            source: fields.source,
            count: fields.count,
            file: fields.file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_none() {
        let r = Resolution::none();
        assert!(r.is_empty());
        assert_eq!(r.source, "none");
    }

    #[test]
    fn test_record_serialization_keys() {
        let record = ReportRecord::new(
            "2025-08-20",
            RecordFields {
                source: "google-trends(PL)".to_string(),
                count: 5,
                file: "2025-08-20.md".to_string(),
            },
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "date": "2025-08-20",
                "source": "google-trends(PL)",
                "count": 5,
                "file": "2025-08-20.md"
            })
        );
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{"date": "2025-08-19", "source": "x", "count": 0, "file": "2025-08-19.md"}"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, "2025-08-19");
        assert_eq!(record.count, 0);
    }

    #[test]
    fn test_record_rejects_negative_count() {
        let json = r#"{"date": "2025-08-19", "source": "x", "count": -1, "file": "2025-08-19.md"}"#;
        assert!(serde_json::from_str::<ReportRecord>(json).is_err());
    }
}
