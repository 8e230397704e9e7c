mod chart;
mod currency;
mod range;

pub use chart::ChartSummary;
pub use currency::{PersistedSelection, WatchedCurrency};
pub use range::TimeRange;
