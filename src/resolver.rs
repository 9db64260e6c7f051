//! Source resolution: pick the first strategy that yields any trends.
//!
//! Strategies are tried strictly in the order given. The first one whose
//! post-processed list is non-empty wins outright; later strategies are never
//! called and nothing is merged across strategies. When every strategy comes
//! back empty the run still continues with [`Resolution::none`].

use crate::models::Resolution;
use crate::sources::TrendStrategy;
use tracing::{info, instrument, warn};

#[instrument(level = "info", skip_all, fields(strategies = strategies.len(), max_items = max_items))]
pub async fn resolve<S>(strategies: &[S], max_items: usize) -> Resolution
where
    S: TrendStrategy,
{
    for strategy in strategies {
        let trends = strategy.attempt(max_items).await;
        if trends.is_empty() {
            info!(strategy = strategy.label(), "Strategy yielded no trends; falling back");
            continue;
        }
        info!(strategy = strategy.label(), count = trends.len(), "Resolved trends");
        return Resolution {
            trends,
            source: strategy.label().to_string(),
        };
    }

    warn!("All strategies exhausted; continuing with an empty list");
    Resolution::none()
}
