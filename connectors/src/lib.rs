pub mod gecko;

use async_trait::async_trait;
use common::{
    models::{ChartSummary, TimeRange},
    Result,
};

/// Trait defining the interface for remote price-chart providers.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the historical price series for one coin over the given range.
    ///
    /// A single attempt per call; retries and caching are the caller's
    /// business.
    async fn fetch_chart(&self, symbol: &str, range: TimeRange) -> Result<ChartSummary>;
}
