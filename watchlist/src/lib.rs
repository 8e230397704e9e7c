mod service;
pub mod widget;

pub use service::{WatchlistService, WatchlistSnapshot};

#[cfg(test)]
mod testutil;
