use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{Article, NewArticle, StoreError};

/// Concurrency-safe in-memory store for articles.
///
/// Articles are indexed twice: by ID in the primary table and by owning feed
/// in a secondary index holding IDs in insertion order. Both indexes are
/// updated under one exclusive lock, so an article can never be observed in
/// one but not the other.
///
/// The store is a dumb ledger: it accepts duplicate titles without
/// complaint. Deduplication is the reconcile use case's responsibility.
/// The ID namespace is independent of the feed store's.
#[derive(Debug, Clone, Default)]
pub struct ArticleStore {
    inner: Arc<RwLock<ArticleTable>>,
}

#[derive(Debug)]
struct ArticleTable {
    articles: HashMap<i64, Article>,
    // feed ID -> article IDs in insertion order
    by_feed: HashMap<i64, Vec<i64>>,
    next_id: i64,
}

impl Default for ArticleTable {
    fn default() -> Self {
        Self {
            articles: HashMap::new(),
            by_feed: HashMap::new(),
            next_id: 1,
        }
    }
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ArticleTable>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ArticleTable>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    /// Store a new unread article and return it with its assigned ID.
    pub fn create(&self, new: NewArticle) -> Result<Article, StoreError> {
        let mut table = self.write()?;

        let id = table.next_id;
        table.next_id += 1;

        let article = Article {
            id,
            feed_id: new.feed_id,
            title: new.title,
            content: new.content,
            published: new.published,
            read: false,
        };
        table.by_feed.entry(new.feed_id).or_default().push(id);
        table.articles.insert(id, article.clone());

        Ok(article)
    }

    /// All articles belonging to a feed, in insertion order.
    ///
    /// An unknown feed ID yields an empty list, not an error.
    pub fn get_by_feed(&self, feed_id: i64) -> Result<Vec<Article>, StoreError> {
        let table = self.read()?;
        let ids = match table.by_feed.get(&feed_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids
            .iter()
            .filter_map(|id| table.articles.get(id))
            .cloned()
            .collect())
    }

    /// Snapshot of every article across all feeds; order is not significant.
    pub fn get_all(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.read()?.articles.values().cloned().collect())
    }

    /// Flip an article to read. Idempotent; unknown IDs fail with
    /// [`StoreError::ArticleNotFound`].
    pub fn mark_read(&self, article_id: i64) -> Result<(), StoreError> {
        let mut table = self.write()?;
        let article = table
            .articles
            .get_mut(&article_id)
            .ok_or(StoreError::ArticleNotFound(article_id))?;
        article.read = true;
        Ok(())
    }
}
