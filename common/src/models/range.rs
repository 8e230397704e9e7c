use serde::{Deserialize, Serialize};

/// Historical window for chart data. Exactly one range is active at a time,
/// shared by every watched coin.
///
/// The serialized form doubles as the remote API path segment, so the
/// persisted value and the request URL always agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeRange {
    #[serde(rename = "24_hours")]
    Day,
    #[serde(rename = "7_days")]
    Week,
    #[serde(rename = "30_days")]
    Month,
    #[serde(rename = "90_days")]
    ThreeMonths,
    #[serde(rename = "max")]
    Max,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::ThreeMonths,
        TimeRange::Max,
    ];

    /// Path segment of the remote chart endpoint for this range.
    pub fn path_segment(self) -> &'static str {
        match self {
            TimeRange::Day => "24_hours",
            TimeRange::Week => "7_days",
            TimeRange::Month => "30_days",
            TimeRange::ThreeMonths => "90_days",
            TimeRange::Max => "max",
        }
    }

    /// The range after this one, wrapping from Max back to Day.
    pub fn next(self) -> TimeRange {
        match self {
            TimeRange::Day => TimeRange::Week,
            TimeRange::Week => TimeRange::Month,
            TimeRange::Month => TimeRange::ThreeMonths,
            TimeRange::ThreeMonths => TimeRange::Max,
            TimeRange::Max => TimeRange::Day,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::Day
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_every_range() {
        let mut range = TimeRange::Day;
        for expected in [
            TimeRange::Week,
            TimeRange::Month,
            TimeRange::ThreeMonths,
            TimeRange::Max,
            TimeRange::Day,
        ] {
            range = range.next();
            assert_eq!(range, expected);
        }
    }

    #[test]
    fn serializes_as_path_segment() {
        for range in TimeRange::ALL {
            let json = serde_json::to_string(&range).unwrap();
            assert_eq!(json, format!("\"{}\"", range.path_segment()));
            let back: TimeRange = serde_json::from_str(&json).unwrap();
            assert_eq!(back, range);
        }
    }

    #[test]
    fn default_is_day() {
        assert_eq!(TimeRange::default(), TimeRange::Day);
    }
}
