//! Google Trends strategies.
//!
//! Three public endpoints expose the daily trending searches for a country.
//! None of them is officially supported. They are tried in this order:
//!
//! 1. `trending-rss`: `https://trends.google.com/trending/rss?geo=PL`
//! 2. `daily-rss`: `https://trends.google.com/trends/trendingsearches/daily/rss?geo=PL`
//! 3. `dailytrends-api`: `https://trends.google.com/trends/api/dailytrends?hl=pl-PL&tz=120&geo=PL&ns=15`
//!
//! Both feeds are plain RSS 2.0 where every `<item><title>` is a trend. The
//! JSON endpoint prefixes its body with `)]}',` which has to be stripped before
//! parsing.

use super::TrendStrategy;
use super::retry::RetryFetch;
use crate::config::Config;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, info, instrument, warn};
use url::Url;

const TRENDING_RSS_URL: &str = "https://trends.google.com/trending/rss";
const DAILY_RSS_URL: &str = "https://trends.google.com/trends/trendingsearches/daily/rss";
const DAILY_TRENDS_API_URL: &str = "https://trends.google.com/trends/api/dailytrends";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) trend_archive";
const JSON_GUARD: &str = ")]}'";

/// Which Google Trends endpoint a strategy talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TrendingRss,
    DailyRss,
    DailyTrendsApi,
}

impl Endpoint {
    /// All endpoints, highest priority first.
    pub const PRIORITY: [Endpoint; 3] = [
        Endpoint::TrendingRss,
        Endpoint::DailyRss,
        Endpoint::DailyTrendsApi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::TrendingRss => "trending-rss",
            Endpoint::DailyRss => "daily-rss",
            Endpoint::DailyTrendsApi => "dailytrends-api",
        }
    }
}

/// A single Google Trends endpoint bound to a country.
#[derive(Debug, Clone)]
pub struct GoogleTrends {
    client: Client,
    endpoint: Endpoint,
    geo: String,
    language: String,
    tz_offset_minutes: i32,
}

impl GoogleTrends {
    pub fn new(client: Client, endpoint: Endpoint, config: &Config) -> Self {
        Self {
            client,
            endpoint,
            geo: config.geo.clone(),
            language: config.language.clone(),
            tz_offset_minutes: config.tz_offset_minutes,
        }
    }

    /// Full request URL for this endpoint.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let geo = self.geo.as_str();
        match self.endpoint {
            Endpoint::TrendingRss => Url::parse_with_params(TRENDING_RSS_URL, &[("geo", geo)]),
            Endpoint::DailyRss => Url::parse_with_params(DAILY_RSS_URL, &[("geo", geo)]),
            Endpoint::DailyTrendsApi => {
                let tz = self.tz_offset_minutes.to_string();
                Url::parse_with_params(
                    DAILY_TRENDS_API_URL,
                    &[
                        ("hl", self.language.as_str()),
                        ("tz", tz.as_str()),
                        ("geo", geo),
                        ("ns", "15"),
                    ],
                )
            }
        }
    }

    fn parse(&self, body: &str) -> Result<Vec<String>, Box<dyn Error>> {
        match self.endpoint {
            Endpoint::TrendingRss | Endpoint::DailyRss => parse_rss(body),
            Endpoint::DailyTrendsApi => parse_daily_trends(body),
        }
    }
}

impl TrendStrategy for GoogleTrends {
    fn label(&self) -> &str {
        self.endpoint.label()
    }

    #[instrument(level = "info", skip_all, fields(strategy = self.endpoint.label(), geo = %self.geo))]
    async fn fetch(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let url = self.url()?;
        debug!(%url, "Requesting Google Trends");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match self.parse(&body) {
            Ok(items) => {
                info!(count = items.len(), bytes = body.len(), "Parsed trends");
                Ok(items)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    response_preview = %truncate_for_log(&body, 300),
                    "Upstream returned an unparseable body"
                );
                Err(e)
            }
        }
    }
}

/// Build every Google Trends strategy in priority order, each wrapped with
/// the configured retry policy and sharing one HTTP client.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be constructed (e.g. TLS backend
/// initialization).
pub fn default_strategies(config: &Config) -> Result<Vec<RetryFetch<GoogleTrends>>, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(StdDuration::from_secs(config.request_timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;

    let base_delay = StdDuration::from_secs(config.retry_base_delay_secs);
    Ok(Endpoint::PRIORITY
        .into_iter()
        .map(|endpoint| {
            RetryFetch::new(
                GoogleTrends::new(client.clone(), endpoint, config),
                config.retry_attempts,
                base_delay,
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
}

/// Extract the `<item><title>` values of an RSS 2.0 document, in order.
pub fn parse_rss(xml: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss.channel.items.into_iter().map(|i| i.title).collect())
}

#[derive(Debug, Deserialize)]
struct DailyTrendsResponse {
    default: DailyTrendsBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyTrendsBody {
    #[serde(default)]
    trending_searches_days: Vec<TrendingDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendingDay {
    #[serde(default)]
    trending_searches: Vec<TrendingSearch>,
}

#[derive(Debug, Deserialize)]
struct TrendingSearch {
    title: SearchTitle,
}

#[derive(Debug, Deserialize)]
struct SearchTitle {
    query: String,
}

/// Extract the search queries from a `dailytrends` JSON body, newest day first.
pub fn parse_daily_trends(body: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let trimmed = body.trim_start();
    let json = match trimmed.strip_prefix(JSON_GUARD) {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => trimmed,
    };
    let parsed: DailyTrendsResponse = serde_json::from_str(json)?;
    Ok(parsed
        .default
        .trending_searches_days
        .into_iter()
        .flat_map(|day| day.trending_searches)
        .map(|s| s.title.query)
        .collect())
}
