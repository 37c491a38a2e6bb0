use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{Feed, NewFeed, StoreError};

/// Concurrency-safe in-memory store for feeds, indexed by ID and by URL.
///
/// The store owns its state behind a single reader-writer lock: reads run
/// concurrently with other reads, writes are fully serialized, and a create
/// is either completely visible to a concurrent reader or not visible at
/// all. Cloning the store clones the handle, not the data: all clones see
/// the same feeds.
///
/// IDs start at 1 and increase strictly with each successful create. A
/// rejected create (duplicate URL) consumes no ID.
#[derive(Debug, Clone, Default)]
pub struct FeedStore {
    inner: Arc<RwLock<FeedTable>>,
}

#[derive(Debug)]
struct FeedTable {
    feeds: HashMap<i64, Feed>,
    // URL -> feed ID; one entry per feed, kept in lockstep with `feeds`
    by_url: HashMap<String, i64>,
    next_id: i64,
}

impl Default for FeedTable {
    fn default() -> Self {
        Self {
            feeds: HashMap::new(),
            by_url: HashMap::new(),
            next_id: 1,
        }
    }
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, FeedTable>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, FeedTable>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    /// Store a new feed and return the stored record with its assigned ID.
    ///
    /// Fails with [`StoreError::FeedExists`] when a feed with the same URL
    /// is already present; the ID counter does not advance in that case.
    pub fn create(&self, new: NewFeed) -> Result<Feed, StoreError> {
        let mut table = self.write()?;

        if table.by_url.contains_key(&new.url) {
            return Err(StoreError::FeedExists(new.url));
        }

        let id = table.next_id;
        table.next_id += 1;

        let feed = Feed {
            id,
            url: new.url,
            title: new.title,
            description: new.description,
        };
        table.by_url.insert(feed.url.clone(), id);
        table.feeds.insert(id, feed.clone());

        Ok(feed)
    }

    /// Look up a feed by its URL. Absent is `Ok(None)`, not an error.
    pub fn get_by_url(&self, url: &str) -> Result<Option<Feed>, StoreError> {
        let table = self.read()?;
        let feed = table
            .by_url
            .get(url)
            .and_then(|id| table.feeds.get(id))
            .cloned();
        Ok(feed)
    }

    /// Look up a feed by its ID. Absent is `Ok(None)`, not an error.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Feed>, StoreError> {
        Ok(self.read()?.feeds.get(&id).cloned())
    }

    /// Snapshot of all feeds at call time. Order is not significant;
    /// callers needing determinism must sort.
    pub fn get_all(&self) -> Result<Vec<Feed>, StoreError> {
        Ok(self.read()?.feeds.values().cloned().collect())
    }
}
