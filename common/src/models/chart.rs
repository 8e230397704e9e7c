use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one successful chart fetch: the raw price series plus the
/// statistics derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSummary {
    /// USD prices in chronological order, as delivered by the source.
    pub series: Vec<f64>,
    /// Last price of the series, 0.0 when the series is empty.
    pub current_price: f64,
    /// Change from the first to the last point, in percent, rounded to two
    /// decimals. 0.0 when the series is empty or starts at zero.
    pub percent_change: f64,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

impl ChartSummary {
    pub fn from_series(series: Vec<f64>) -> Self {
        let current_price = series.last().copied().unwrap_or(0.0);
        let percent_change = match (series.first(), series.last()) {
            (Some(&first), Some(&last)) if first != 0.0 => {
                (((last - first) / first) * 100.0 * 100.0).round() / 100.0
            }
            _ => 0.0,
        };

        Self {
            series,
            current_price,
            percent_change,
            fetched_at: Utc::now(),
        }
    }
}
