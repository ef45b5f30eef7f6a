//! Bounded most-recent-first history of selection patterns.

use bulk_core::Result;
use bulk_core::history::{HISTORY_CAPACITY, HistoryItem};
use bulk_core::ports::HistoryStore;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::debug;

/// Pattern history shared by every pass of a running service.
///
/// Construct once and hand out behind an `Arc`. Duplicates are kept; the
/// oldest entries fall off the tail once capacity is reached.
#[derive(Debug)]
pub struct History {
    items: Mutex<VecDeque<HistoryItem>>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Capacity is capped at [`HISTORY_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(HISTORY_CAPACITY);
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Build a history from persisted items (newest first), trimmed to capacity.
    pub async fn init(store: &dyn HistoryStore, capacity: usize) -> Result<Self> {
        let capacity = capacity.min(HISTORY_CAPACITY);
        let mut items: VecDeque<HistoryItem> = store.load().await?.into();
        items.truncate(capacity);
        debug!(count = items.len(), "Loaded pattern history");
        Ok(Self {
            items: Mutex::new(items),
            capacity,
        })
    }

    /// Write the current snapshot to the store.
    pub async fn persist(&self, store: &dyn HistoryStore) -> Result<()> {
        let snapshot = self.get_all().await;
        store.save(&snapshot).await
    }

    pub async fn add(&self, item: HistoryItem) {
        let mut items = self.items.lock().await;
        items.push_front(item);
        while items.len() > self.capacity {
            items.pop_back();
        }
    }

    pub async fn record(&self, pattern: &str) {
        self.add(HistoryItem::new(pattern)).await;
    }

    /// Snapshot, newest first.
    pub async fn get_all(&self) -> Vec<HistoryItem> {
        self.items.lock().await.iter().cloned().collect()
    }

    pub async fn size(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn clear(&self) {
        self.items.lock().await.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
