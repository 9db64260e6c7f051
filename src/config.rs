//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags and environment variables.
//!
//! ```yaml
//! # trend_archive.yaml (every key optional)
//! max_items: 20
//! source_label: "google-trends(PL)"
//! output_directory: data
//! index_file: index.json
//! geo: PL
//! language: pl-PL
//! tz_offset_minutes: 120
//! request_timeout_secs: 20
//! retry_attempts: 3
//! retry_base_delay_secs: 2
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Everything a run needs to know, passed explicitly to each component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Maximum number of trends kept in a report.
    pub max_items: usize,
    /// Source name recorded in the index and shown in report titles.
    pub source_label: String,
    /// Directory receiving the dated reports and the index file.
    pub output_directory: PathBuf,
    /// Index filename inside `output_directory`.
    pub index_file: String,
    /// Two-letter country code passed to Google Trends.
    pub geo: String,
    /// Interface language for the JSON endpoint (`hl`).
    pub language: String,
    /// Timezone offset in minutes for the JSON endpoint (`tz`).
    pub tz_offset_minutes: i32,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Attempts per strategy, including the first.
    pub retry_attempts: usize,
    /// Linear backoff unit between attempts.
    pub retry_base_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 20,
            source_label: "google-trends(PL)".to_string(),
            output_directory: PathBuf::from("data"),
            index_file: "index.json".to_string(),
            geo: "PL".to_string(),
            language: "pl-PL".to_string(),
            tz_offset_minutes: 120,
            request_timeout_secs: 20,
            retry_attempts: 3,
            retry_base_delay_secs: 2,
        }
    }
}

impl Config {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Build the effective configuration for a run from parsed CLI arguments.
    pub fn resolve(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let base = match &cli.config {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    /// Apply flags and environment variables on top of `self`.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(n) = cli.max_items {
            self.max_items = n;
        }
        if let Some(label) = &cli.source_label {
            self.source_label = label.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_directory = dir.clone();
        }
        if let Some(file) = &cli.index_file {
            self.index_file = file.clone();
        }
        if let Some(geo) = &cli.geo {
            self.geo = geo.clone();
        }
        if let Some(language) = &cli.language {
            self.language = language.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.max_items == 0 {
            return Err("max_items must be at least 1".into());
        }
        if self.retry_attempts == 0 {
            return Err("retry_attempts must be at least 1".into());
        }
        if self.geo.trim().is_empty() {
            return Err("geo must not be empty".into());
        }
        if self.index_file.trim().is_empty() || self.index_file.contains(['/', '\\']) {
            return Err(format!("index_file must be a bare filename, got {:?}", self.index_file).into());
        }
        Ok(())
    }

    /// Full path of the index file.
    pub fn index_path(&self) -> PathBuf {
        self.output_directory.join(&self.index_file)
    }
}
