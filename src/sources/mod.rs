//! Trend sources and the strategy abstraction the resolver iterates over.
//!
//! A strategy is one way of obtaining today's trending searches. Every
//! strategy exposes the same capability:
//!
//! - `fetch()`: one raw attempt against the upstream, which may fail
//! - `attempt(max_items)`: `fetch()` plus post-processing, with failures
//!   swallowed into an empty list
//!
//! # Supported Sources
//!
//! | Strategy | Module | Method | Notes |
//! |----------|--------|--------|-------|
//! | `trending-rss` | [`google`] | RSS 2.0 | Current Google Trends feed |
//! | `daily-rss` | [`google`] | RSS 2.0 | Legacy daily feed |
//! | `dailytrends-api` | [`google`] | JSON | Prefixed with `)]}',` |
//!
//! Retries live in [`retry::RetryFetch`], which wraps any strategy and is a
//! strategy itself.

pub mod google;
pub mod retry;

use itertools::Itertools;
use std::error::Error;
use tracing::warn;

/// One concrete method of obtaining trends from an upstream source.
pub trait TrendStrategy {
    /// Stable name reported as the source of a winning result.
    fn label(&self) -> &str;

    /// Perform one raw fetch. Items are returned as the upstream ranks them,
    /// without any cleanup.
    async fn fetch(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// Fetch and post-process, never failing.
    ///
    /// Any error is logged and turned into an empty list so the caller can
    /// move on to the next strategy.
    async fn attempt(&self, max_items: usize) -> Vec<String> {
        match self.fetch().await {
            Ok(raw) => normalize(raw, max_items),
            Err(e) => {
                warn!(strategy = self.label(), error = %e, "Strategy failed; yielding no trends");
                Vec::new()
            }
        }
    }
}

/// Trim, drop blanks, dedupe in first-seen order, and cap at `max_items`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize(["a", "b", "a", " b "], 10), vec!["a", "b"]);
/// ```
pub fn normalize<I, S>(raw: I, max_items: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .unique()
        .take(max_items)
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory strategies for resolver and pipeline tests.

    use super::TrendStrategy;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::error::Error;

    /// Replays a fixed sequence of outcomes; the last one repeats forever.
    #[derive(Debug)]
    pub struct Scripted {
        label: String,
        outcomes: RefCell<VecDeque<Result<Vec<String>, String>>>,
        last: Result<Vec<String>, String>,
        pub calls: Cell<usize>,
    }

    impl Scripted {
        pub fn new(label: &str, outcomes: Vec<Result<Vec<&str>, &str>>) -> Self {
            let outcomes: VecDeque<Result<Vec<String>, String>> = outcomes
                .into_iter()
                .map(|o| {
                    o.map(|items| items.into_iter().map(String::from).collect())
                        .map_err(String::from)
                })
                .collect();
            let last = outcomes
                .back()
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()));
            Self {
                label: label.to_string(),
                outcomes: RefCell::new(outcomes),
                last,
                calls: Cell::new(0),
            }
        }

        pub fn ok(label: &str, items: Vec<&str>) -> Self {
            Self::new(label, vec![Ok(items)])
        }

        pub fn failing(label: &str) -> Self {
            Self::new(label, vec![Err("connection reset by peer")])
        }
    }

    impl TrendStrategy for Scripted {
        fn label(&self) -> &str {
            &self.label
        }

        async fn fetch(&self) -> Result<Vec<String>, Box<dyn Error>> {
            self.calls.set(self.calls.get() + 1);
            let next = self
                .outcomes
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| self.last.clone());
            next.map_err(|e| e.into())
        }
    }
}
