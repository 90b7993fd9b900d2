//! Record store: the asynchronously loaded record set and its lifecycle.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::model::Record;
use crate::source::RecordSource;

/// Lifecycle of the record load.
///
/// `Idle -> Loading -> Loaded | Failed`, at most once per store.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// The fetch is in flight.
    Loading,
    /// The fetch resolved with these records, in received order.
    Loaded(Vec<Record>),
    /// The fetch or decode failed with this message.
    Failed(String),
}

impl LoadState {
    /// Check if no load has been started.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if the load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if records are loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Check if the load failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Check if the load has resolved either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }

    /// Loaded records, or an empty slice in every other state.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Loaded(records) => records,
            _ => &[],
        }
    }

    /// The failure message, if the load failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Owns the loaded record set for one mounted table.
///
/// The store issues exactly one fetch per mount and never retries. Tearing
/// the table down with [`unmount`](Self::unmount) cancels the fetch; a
/// result that resolves afterwards is discarded instead of committed.
///
/// Clones share state, so a clone can be moved into the load task while
/// the caller keeps reading from the original.
///
/// # Example
///
/// ```ignore
/// let store = RecordStore::new();
/// store.mount(client);
///
/// // on every render
/// let pager = PagerViewModel::new(count, page);
/// let view = TableView::build(&store.state(), &selection, pager);
///
/// // on teardown
/// store.unmount();
/// ```
#[derive(Debug, Clone)]
pub struct RecordStore {
    inner: Arc<RwLock<LoadState>>,
    dirty: Arc<AtomicBool>,
    changed: Arc<Notify>,
    cancel: CancellationToken,
}

impl RecordStore {
    /// Create a new store in idle state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LoadState::Idle)),
            dirty: Arc::new(AtomicBool::new(false)),
            changed: Arc::new(Notify::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Start the single load on the current tokio runtime.
    ///
    /// Returns `None` if the store was already mounted or has been unmounted.
    pub fn mount<S>(&self, source: S) -> Option<JoinHandle<()>>
    where
        S: RecordSource + 'static,
    {
        if !self.begin() {
            return None;
        }
        let store = self.clone();
        Some(tokio::spawn(async move {
            store.run(&source).await;
        }))
    }

    /// Run the single load inline.
    ///
    /// Returns `false` without fetching if the store was already mounted or
    /// has been unmounted.
    pub async fn load<S>(&self, source: &S) -> bool
    where
        S: RecordSource + ?Sized,
    {
        if !self.begin() {
            return false;
        }
        self.run(source).await;
        true
    }

    /// Tear the store down.
    ///
    /// After this returns no further state transition is visible.
    pub fn unmount(&self) {
        // Holding the write lock orders cancellation against a concurrent commit.
        let _guard = self.inner.write();
        if !self.cancel.is_cancelled() {
            log::debug!("Record store unmounted");
        }
        self.cancel.cancel();
        self.changed.notify_waiters();
    }

    /// Check if the store has been unmounted
    pub fn is_unmounted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Get a clone of the current state
    pub fn state(&self) -> LoadState {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(LoadState::Idle)
    }

    /// Get a clone of the loaded records (empty unless loaded)
    pub fn records(&self) -> Vec<Record> {
        self.inner
            .read()
            .map(|guard| guard.records().to_vec())
            .unwrap_or_default()
    }

    /// Get the failure message, if the load failed
    pub fn error(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.error().map(str::to_string))
    }

    /// Check if the state has changed since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Wait until the load resolves or the store is unmounted.
    ///
    /// Returns the state at that point.
    pub async fn settled(&self) -> LoadState {
        loop {
            let notified = self.changed.notified();
            let state = self.state();
            if state.is_settled() || self.is_unmounted() {
                return state;
            }
            notified.await;
        }
    }

    /// Move from `Idle` to `Loading`. Only the first call on a live store succeeds.
    fn begin(&self) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if self.cancel.is_cancelled() {
            log::debug!("Ignoring mount of an unmounted record store");
            return false;
        }
        if !guard.is_idle() {
            log::debug!("Record store already mounted, not fetching again");
            return false;
        }
        *guard = LoadState::Loading;
        drop(guard);

        log::debug!("Record store loading");
        self.mark_changed();
        true
    }

    async fn run<S>(&self, source: &S)
    where
        S: RecordSource + ?Sized,
    {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                log::debug!("Record load cancelled before completion");
                return;
            }
            result = source.fetch() => result,
        };

        let next = match result {
            Ok(records) => {
                warn_on_duplicate_ids(&records);
                log::debug!("Record store loaded {} records", records.len());
                LoadState::Loaded(records)
            }
            Err(e) => {
                log::warn!("Record load failed: {}", e);
                LoadState::Failed(e.to_string())
            }
        };

        self.commit(next);
    }

    /// Apply a resolved load unless the store was unmounted meanwhile.
    fn commit(&self, next: LoadState) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if self.cancel.is_cancelled() {
            log::debug!("Discarding load result after unmount");
            return false;
        }
        *guard = next;
        drop(guard);

        self.mark_changed();
        true
    }

    fn mark_changed(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.changed.notify_waiters();
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn warn_on_duplicate_ids(records: &[Record]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            log::warn!("Duplicate record id {} in loaded snapshot", record.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        let loaded = LoadState::Loaded(vec![Record::new(1)]);
        assert!(loaded.is_loaded() && loaded.is_settled());
        assert_eq!(loaded.records().len(), 1);
        assert_eq!(loaded.error(), None);

        let failed = LoadState::Failed("boom".into());
        assert!(failed.is_failed() && failed.is_settled());
        assert!(failed.records().is_empty());
        assert_eq!(failed.error(), Some("boom"));

        assert!(LoadState::Loading.records().is_empty());
        assert!(!LoadState::Loading.is_settled());
        assert!(LoadState::default().is_idle());
    }

    #[test]
    fn test_commit_after_unmount_is_discarded() {
        let store = RecordStore::new();
        assert!(store.begin());
        store.unmount();

        assert!(!store.commit(LoadState::Loaded(vec![Record::new(1)])));
        assert_eq!(store.state(), LoadState::Loading);
    }

    #[test]
    fn test_begin_only_once() {
        let store = RecordStore::new();
        assert!(store.begin());
        assert!(!store.begin());
        assert!(store.is_dirty());
        store.clear_dirty();
        assert!(!store.is_dirty());
    }
}
