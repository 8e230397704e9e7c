use async_trait::async_trait;
use common::models::{ChartSummary, TimeRange};
use common::{Error, Result};
use connectors::PriceFeed;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Deterministic feed: per-symbol series and artificial latency, recorded
/// calls. A symbol without a configured chart fails its fetch.
pub struct FakeFeed {
    charts: RwLock<HashMap<String, Vec<f64>>>,
    delays: RwLock<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, TimeRange)>>,
}

impl FakeFeed {
    pub fn new() -> Self {
        Self {
            charts: RwLock::new(HashMap::new()),
            delays: RwLock::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_chart(&self, symbol: &str, series: Vec<f64>) {
        self.charts
            .write()
            .unwrap()
            .insert(symbol.to_string(), series);
    }

    pub fn fail(&self, symbol: &str) {
        self.charts.write().unwrap().remove(symbol);
    }

    pub fn delay(&self, symbol: &str, delay: Duration) {
        self.delays
            .write()
            .unwrap()
            .insert(symbol.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<(String, TimeRange)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceFeed for FakeFeed {
    async fn fetch_chart(&self, symbol: &str, range: TimeRange) -> Result<ChartSummary> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), range));

        // Capture the configured outcome up front so a test can change the
        // configuration while this fetch is sleeping.
        let series = self.charts.read().unwrap().get(symbol).cloned();
        let delay = self.delays.read().unwrap().get(symbol).copied();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match series {
            Some(series) => Ok(ChartSummary::from_series(series)),
            None => Err(Error::Decode(format!("no chart configured for {}", symbol))),
        }
    }
}
