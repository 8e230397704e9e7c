use chrono::{DateTime, Utc};
use common::models::WatchedCurrency;
use connectors::PriceFeed;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use store::WatchlistStore;
use tracing::{debug, warn};

/// Delay the host scheduler is asked to wait before requesting the next
/// entry; the host may refresh earlier or later at its discretion.
pub const SUGGESTED_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Coins shown on the widget when no explicit limit is configured.
pub const DEFAULT_COIN_LIMIT: usize = 3;

/// One rendered widget state.
#[derive(Debug, Clone)]
pub struct WidgetEntry {
    pub generated_at: DateTime<Utc>,
    pub coins: Vec<WatchedCurrency>,
}

#[derive(Debug, Clone)]
pub struct WidgetTimeline {
    pub entry: WidgetEntry,
    pub refresh_after: Duration,
}

/// Builds widget snapshots for the widget process.
///
/// The widget never sees the app's live watchlist; it reads the persisted
/// selection and re-derives its own chart data from the remote feed.
pub struct WidgetProvider {
    feed: Arc<dyn PriceFeed>,
    store: WatchlistStore,
    limit: usize,
}

impl WidgetProvider {
    pub fn new(feed: Arc<dyn PriceFeed>, store: WatchlistStore) -> Self {
        Self::with_limit(feed, store, DEFAULT_COIN_LIMIT)
    }

    pub fn with_limit(feed: Arc<dyn PriceFeed>, store: WatchlistStore, limit: usize) -> Self {
        Self { feed, store, limit }
    }

    /// Produce the next timeline entry plus the suggested refresh delay.
    pub async fn timeline(&self) -> WidgetTimeline {
        WidgetTimeline {
            entry: self.snapshot().await,
            refresh_after: SUGGESTED_REFRESH_INTERVAL,
        }
    }

    /// Fetch charts for the first `limit` saved names concurrently,
    /// preserving watchlist order. A coin whose fetch fails is left off the
    /// widget rather than rendered empty.
    pub async fn snapshot(&self) -> WidgetEntry {
        let selection = self.store.load();
        let range = selection.time_range;
        let names: Vec<String> = selection
            .watched_names
            .into_iter()
            .take(self.limit)
            .collect();

        debug!("Building widget entry for {} coins over {}", names.len(), range);

        let fetches = names.into_iter().map(|name| {
            let feed = Arc::clone(&self.feed);
            async move {
                match feed.fetch_chart(&name, range).await {
                    Ok(summary) => {
                        let mut coin = WatchedCurrency::new(&name);
                        coin.apply_summary(summary);
                        Some(coin)
                    }
                    Err(e) => {
                        warn!("Leaving {} off the widget: {}", name, e);
                        None
                    }
                }
            }
        });

        let coins = join_all(fetches).await.into_iter().flatten().collect();

        WidgetEntry {
            generated_at: Utc::now(),
            coins,
        }
    }
}
