use crate::{KeyValueStore, StoreError};
use common::models::{PersistedSelection, TimeRange};
use std::sync::Arc;
use tracing::warn;

pub const WATCHED_CURRENCIES_KEY: &str = "watched_currencies";
pub const TIME_RANGE_KEY: &str = "selected_time_range";

/// Typed persistence for the cross-process selection: the ordered watched
/// names and the active time range, stored under two keys.
pub struct WatchlistStore {
    kv: Arc<dyn KeyValueStore>,
}

impl WatchlistStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the saved selection.
    ///
    /// A missing or unreadable key falls back to its default (empty list,
    /// day range) instead of failing; corrupt saved state is never fatal.
    pub fn load(&self) -> PersistedSelection {
        let watched_names = match self.kv.get(WATCHED_CURRENCIES_KEY) {
            Some(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(names) => names,
                Err(e) => {
                    warn!("Discarding unreadable saved watchlist: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let time_range = match self.kv.get(TIME_RANGE_KEY) {
            Some(bytes) => match serde_json::from_slice::<TimeRange>(&bytes) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Discarding unreadable saved time range: {}", e);
                    TimeRange::default()
                }
            },
            None => TimeRange::default(),
        };

        PersistedSelection {
            watched_names,
            time_range,
        }
    }

    pub fn save(&self, selection: &PersistedSelection) -> Result<(), StoreError> {
        self.save_names(&selection.watched_names)?;
        self.save_time_range(selection.time_range)
    }

    pub fn save_names(&self, names: &[String]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(names).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.kv.set(WATCHED_CURRENCIES_KEY, &bytes)
    }

    pub fn save_time_range(&self, range: TimeRange) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&range).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.kv.set(TIME_RANGE_KEY, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, SharedFileStore, StoreConfig};

    fn memory_store() -> WatchlistStore {
        WatchlistStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn load_without_saved_state_yields_defaults() {
        let store = memory_store();
        let selection = store.load();
        assert!(selection.watched_names.is_empty());
        assert_eq!(selection.time_range, TimeRange::Day);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = memory_store();
        let selection = PersistedSelection {
            watched_names: vec!["bitcoin".to_string(), "ethereum".to_string()],
            time_range: TimeRange::ThreeMonths,
        };

        store.save(&selection).unwrap();
        assert_eq!(store.load(), selection);
    }

    #[test]
    fn empty_selection_round_trips() {
        let store = memory_store();
        let selection = PersistedSelection::default();
        store.save(&selection).unwrap();
        assert_eq!(store.load(), selection);
    }

    #[test]
    fn corrupt_names_fall_back_to_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(WATCHED_CURRENCIES_KEY, b"not json").unwrap();
        kv.set(TIME_RANGE_KEY, b"\"30_days\"").unwrap();

        let selection = WatchlistStore::new(kv).load();
        assert!(selection.watched_names.is_empty());
        assert_eq!(selection.time_range, TimeRange::Month);
    }

    #[test]
    fn corrupt_range_falls_back_to_day() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(WATCHED_CURRENCIES_KEY, b"[\"bitcoin\"]").unwrap();
        kv.set(TIME_RANGE_KEY, b"\"fortnight\"").unwrap();

        let selection = WatchlistStore::new(kv).load();
        assert_eq!(selection.watched_names, vec!["bitcoin".to_string()]);
        assert_eq!(selection.time_range, TimeRange::Day);
    }

    #[test]
    fn round_trips_through_a_shared_directory() {
        let dir = tempfile::tempdir().unwrap();
        let selection = PersistedSelection {
            watched_names: vec!["dogecoin".to_string()],
            time_range: TimeRange::Max,
        };

        let app = WatchlistStore::new(Arc::new(
            SharedFileStore::new(StoreConfig::at(dir.path())).unwrap(),
        ));
        app.save(&selection).unwrap();

        // The widget process opens its own store over the same namespace.
        let widget = WatchlistStore::new(Arc::new(
            SharedFileStore::new(StoreConfig::at(dir.path())).unwrap(),
        ));
        assert_eq!(widget.load(), selection);
    }
}
