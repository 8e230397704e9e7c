use crate::PriceFeed;
use async_trait::async_trait;
use common::{
    models::{ChartSummary, TimeRange},
    Error, Result,
};
use serde::Deserialize;
use tracing::debug;

const GECKO_BASE_URL: &str = "https://www.coingecko.com";

/// Chart client for the CoinGecko public price-chart endpoint.
pub struct GeckoConnector {
    client: reqwest::Client,
    base_url: String,
}

impl GeckoConnector {
    pub fn new() -> Self {
        Self::with_base_url(GECKO_BASE_URL)
    }

    /// Point the connector at a different host (used by tests and proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, symbol: &str, range: TimeRange) -> String {
        format!(
            "{}/price_charts/{}/usd/{}.json",
            self.base_url,
            symbol.to_lowercase(),
            range.path_segment()
        )
    }
}

impl Default for GeckoConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload shape: `{"stats": [[timestampMs, price], ...]}`.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    stats: Vec<Vec<f64>>,
}

impl ChartResponse {
    /// Second element of each pair, in delivery order. Malformed points are
    /// skipped rather than failing the whole chart.
    fn prices(&self) -> Vec<f64> {
        self.stats
            .iter()
            .filter_map(|point| point.get(1).copied())
            .collect()
    }
}

#[async_trait]
impl PriceFeed for GeckoConnector {
    async fn fetch_chart(&self, symbol: &str, range: TimeRange) -> Result<ChartSummary> {
        let url = self.chart_url(symbol, range);

        debug!("Fetching price chart: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::Network)?
            .error_for_status()
            .map_err(Error::Network)?;

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| Error::Decode(format!("Failed to parse chart payload: {}", e)))?;

        Ok(ChartSummary::from_series(payload.prices()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_lowercases_symbol_and_uses_range_segment() {
        let connector = GeckoConnector::new();
        assert_eq!(
            connector.chart_url("Bitcoin", TimeRange::Week),
            "https://www.coingecko.com/price_charts/bitcoin/usd/7_days.json"
        );
        assert_eq!(
            connector.chart_url("dogecoin", TimeRange::Max),
            "https://www.coingecko.com/price_charts/dogecoin/usd/max.json"
        );
    }

    #[test]
    fn parses_stats_pairs_into_prices() {
        let payload: ChartResponse = serde_json::from_str(
            r#"{"stats": [[1700000000000, 100.0], [1700000060000, 110.5], [1700000120000, 108.25]]}"#,
        )
        .unwrap();
        assert_eq!(payload.prices(), vec![100.0, 110.5, 108.25]);
    }

    #[test]
    fn skips_points_without_a_price() {
        let payload: ChartResponse =
            serde_json::from_str(r#"{"stats": [[1700000000000], [1700000060000, 42.0], []]}"#)
                .unwrap();
        assert_eq!(payload.prices(), vec![42.0]);
    }

    #[test]
    fn rejects_payload_without_stats() {
        assert!(serde_json::from_str::<ChartResponse>(r#"{"prices": []}"#).is_err());
    }
}
