use crate::models::{ChartSummary, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the watchlist.
///
/// The `id` is assigned once at creation and stays stable across refreshes,
/// so in-flight fetch results can always be matched back to the right entry
/// no matter how the list has been reordered in the meantime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedCurrency {
    pub id: String,
    /// Case-insensitive coin identifier (e.g. "bitcoin").
    pub name: String,
    pub current_price: f64,
    pub percent_change: f64,
    pub series: Vec<f64>,
    /// A fetch for this entry is in flight; prior data stays displayable.
    pub refreshing: bool,
    /// Message of the most recent failed fetch, cleared on success.
    pub last_error: Option<String>,
}

impl WatchedCurrency {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            current_price: 0.0,
            percent_change: 0.0,
            series: Vec::new(),
            refreshing: true,
            last_error: None,
        }
    }

    /// Copy a completed fetch into this entry and mark it settled.
    pub fn apply_summary(&mut self, summary: ChartSummary) {
        self.series = summary.series;
        self.current_price = summary.current_price;
        self.percent_change = summary.percent_change;
        self.refreshing = false;
        self.last_error = None;
    }

    /// True while no fetch has ever succeeded for this entry.
    pub fn never_loaded(&self) -> bool {
        self.series.is_empty()
    }
}

/// The durable selection shared between the app and widget processes: the
/// ordered list of watched names plus the active time range. Nothing else
/// crosses the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSelection {
    pub watched_names: Vec<String>,
    pub time_range: TimeRange,
}

impl Default for PersistedSelection {
    fn default() -> Self {
        Self {
            watched_names: Vec::new(),
            time_range: TimeRange::default(),
        }
    }
}
