mod config;
mod error;
mod kv;
mod watchlist_store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore, SharedFileStore};
pub use watchlist_store::{WatchlistStore, TIME_RANGE_KEY, WATCHED_CURRENCIES_KEY};
