use common::models::{ChartSummary, TimeRange, WatchedCurrency};
use common::Result;
use connectors::PriceFeed;
use futures::future::join_all;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use store::WatchlistStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Immutable view of the watchlist, published after every observable
/// mutation. Presentation layers read or subscribe to this instead of the
/// live state.
#[derive(Debug, Clone, Default)]
pub struct WatchlistSnapshot {
    pub entries: Vec<WatchedCurrency>,
    pub time_range: TimeRange,
    /// True only while the first refresh after a restore is running.
    pub initial_loading: bool,
}

#[derive(Default)]
struct WatchState {
    entries: Vec<WatchedCurrency>,
    time_range: TimeRange,
    initial_loading: bool,
}

/// Owns the watchlist and coordinates concurrent per-coin refreshes.
///
/// All mutation happens in short critical sections that are never held
/// across an await, so fetch completions can land in any order without two
/// tasks touching one entry at the same time. Results are matched back to
/// entries by stable id; a result whose entry was removed, or whose range
/// was superseded while it was in flight, is dropped.
///
/// The service is a cheap handle; clones share the same state.
#[derive(Clone)]
pub struct WatchlistService {
    feed: Arc<dyn PriceFeed>,
    store: Arc<WatchlistStore>,
    state: Arc<RwLock<WatchState>>,
    updates: Arc<watch::Sender<WatchlistSnapshot>>,
}

impl WatchlistService {
    pub fn new(feed: Arc<dyn PriceFeed>, store: WatchlistStore) -> Self {
        let (updates, _) = watch::channel(WatchlistSnapshot::default());

        Self {
            feed,
            store: Arc::new(store),
            state: Arc::new(RwLock::new(WatchState::default())),
            updates: Arc::new(updates),
        }
    }

    /// Restore the persisted selection and run the first refresh to
    /// completion. Saved names come back as refreshing entries with no data
    /// so the list renders immediately.
    pub async fn initialize(&self) {
        let selection = self.store.load();

        info!("Restoring {} watched currencies", selection.watched_names.len());

        {
            let mut state = self.write_state();
            state.time_range = selection.time_range;
            state.entries = selection
                .watched_names
                .iter()
                .map(|name| WatchedCurrency::new(name))
                .collect();
            state.initial_loading = !state.entries.is_empty();
        }
        self.publish();

        self.refresh_all().await;

        self.write_state().initial_loading = false;
        self.publish();
    }

    /// Append a coin and fetch its chart in the background, concurrently
    /// with any refresh already in flight.
    ///
    /// The name is lower-cased before it is stored; a name already on the
    /// list (case-insensitively) or an empty name is rejected with `None`.
    /// The returned handle resolves once the initial fetch has settled;
    /// callers that do not care may drop it.
    pub fn add_currency(&self, name: &str) -> Option<JoinHandle<()>> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        let (id, range) = {
            let mut state = self.write_state();
            if state
                .entries
                .iter()
                .any(|entry| entry.name.to_lowercase() == name)
            {
                debug!("Ignoring duplicate watchlist entry: {}", name);
                return None;
            }

            let entry = WatchedCurrency::new(&name);
            let id = entry.id.clone();
            let range = state.time_range;
            state.entries.push(entry);
            self.persist_names(&state.entries);
            (id, range)
        };
        self.publish();

        let service = self.clone();
        Some(tokio::spawn(async move {
            let result = service.feed.fetch_chart(&name, range).await;
            service.merge_result(&id, range, result);
        }))
    }

    /// Remove the entry at `index`. Any fetch still in flight for it will be
    /// discarded when it completes.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds; an invalid index is a caller
    /// bug, not a recoverable condition.
    pub fn remove_currency(&self, index: usize) {
        {
            let mut state = self.write_state();
            let removed = state.entries.remove(index);
            debug!("Removed {} from watchlist", removed.name);
            self.persist_names(&state.entries);
        }
        self.publish();
    }

    /// Move the entry at `from` so it ends up at `to`. Safe against
    /// concurrent refresh completion because results are matched by id,
    /// never by position.
    ///
    /// # Panics
    ///
    /// Panics when either index is out of bounds.
    pub fn reorder(&self, from: usize, to: usize) {
        {
            let mut state = self.write_state();
            let entry = state.entries.remove(from);
            state.entries.insert(to, entry);
            self.persist_names(&state.entries);
        }
        self.publish();
    }

    /// Remove every entry and persist the empty list.
    pub fn clear(&self) {
        {
            let mut state = self.write_state();
            state.entries.clear();
            self.persist_names(&state.entries);
        }
        self.publish();
    }

    /// Switch the active range and refetch every entry at it. Prior series
    /// stay visible, marked refreshing, until their replacement arrives.
    pub async fn change_time_range(&self, range: TimeRange) {
        {
            let mut state = self.write_state();
            state.time_range = range;
        }
        if let Err(e) = self.store.save_time_range(range) {
            warn!("Failed to persist time range: {}", e);
        }

        self.refresh_all().await;
    }

    /// Step to the next range in the cycle.
    pub async fn cycle_time_range(&self) {
        let next = self.read_state().time_range.next();
        self.change_time_range(next).await;
    }

    /// Concurrently refetch every watched coin at the active range.
    ///
    /// Entries settle one by one as their fetches come back; a slow coin
    /// never holds up a fast one, and one coin failing never aborts the
    /// rest. Resolves only after every launched fetch has completed, so the
    /// caller can rely on a fully settled list afterwards.
    pub async fn refresh_all(&self) {
        let (targets, range) = {
            let mut state = self.write_state();
            let range = state.time_range;
            for entry in &mut state.entries {
                entry.refreshing = true;
            }
            let targets: Vec<(String, String)> = state
                .entries
                .iter()
                .map(|entry| (entry.id.clone(), entry.name.clone()))
                .collect();
            (targets, range)
        };
        self.publish();

        debug!("Refreshing {} entries over {}", targets.len(), range);

        let fetches = targets.into_iter().map(|(id, name)| async move {
            let result = self.feed.fetch_chart(&name, range).await;
            self.merge_result(&id, range, result);
        });

        join_all(fetches).await;
    }

    /// Current state as an immutable snapshot.
    pub fn snapshot(&self) -> WatchlistSnapshot {
        let state = self.read_state();
        WatchlistSnapshot {
            entries: state.entries.clone(),
            time_range: state.time_range,
            initial_loading: state.initial_loading,
        }
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<WatchlistSnapshot> {
        self.updates.subscribe()
    }

    fn merge_result(&self, id: &str, range: TimeRange, result: Result<ChartSummary>) {
        {
            let mut state = self.write_state();
            if state.time_range != range {
                debug!("Dropping chart fetched for superseded range {}", range);
                return;
            }

            let entry = match state.entries.iter_mut().find(|entry| entry.id == id) {
                Some(entry) => entry,
                None => {
                    debug!("Dropping chart for an entry no longer watched");
                    return;
                }
            };

            match result {
                Ok(summary) => entry.apply_summary(summary),
                Err(e) => {
                    // Keep whatever data the entry had; the list renders it
                    // as stale rather than blank.
                    error!("Failed to refresh {}: {}", entry.name, e);
                    entry.last_error = Some(e.to_string());
                    entry.refreshing = false;
                }
            }
        }
        self.publish();
    }

    fn persist_names(&self, entries: &[WatchedCurrency]) {
        let names: Vec<String> = entries.iter().map(|entry| entry.name.clone()).collect();
        if let Err(e) = self.store.save_names(&names) {
            warn!("Failed to persist watchlist: {}", e);
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn read_state(&self) -> RwLockReadGuard<'_, WatchState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, WatchState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
