use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::feed::{FeedParser, FetchError};
use crate::storage::{Article, ArticleStore, Feed, FeedStore, NewArticle, NewFeed, StoreError};

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced by the aggregation operations.
///
/// Lower-level errors are wrapped with the operation context but never
/// reinterpreted: a parser failure keeps its message intact, and store
/// failures pass through. Nothing is retried here; re-invoking the whole
/// operation is the caller's mechanism, which is safe for
/// [`Aggregator::fetch_articles`] (idempotent by title) but will correctly
/// yield [`AggregatorError::FeedExists`] for a repeated
/// [`Aggregator::add_feed`].
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The URL is already subscribed
    #[error("feed with URL {0} already exists")]
    FeedExists(String),

    /// No feed with this ID
    #[error("feed with ID {0} not found")]
    FeedNotFound(i64),

    /// No article with this ID
    #[error("article with ID {0} not found")]
    ArticleNotFound(i64),

    /// The feed could not be fetched or parsed; message passed through
    #[error("failed to parse feed: {0}")]
    Parse(#[from] FetchError),

    /// The storage layer failed
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Outcome of reconciling one feed during [`Aggregator::refresh_all`].
#[derive(Debug)]
pub struct RefreshOutcome {
    pub feed_id: i64,
    pub title: String,
    pub result: Result<(), AggregatorError>,
}

// ============================================================================
// Aggregator
// ============================================================================

/// The aggregation use cases over a pair of stores and a feed parser.
///
/// The aggregator introduces no parallelism of its own; operations run to
/// completion on the caller's task, blocking only on the stores' internal
/// locks and suspending only across the parser call. The two stores are
/// independent, so a concurrent caller may observe a feed whose articles are
/// not yet all committed. Multi-step writes are not transactional: if an
/// article insert fails partway through, the feed and the articles already
/// written stay in place and the error is returned. There is no rollback.
pub struct Aggregator<P> {
    feeds: FeedStore,
    articles: ArticleStore,
    parser: P,
}

impl<P: FeedParser> Aggregator<P> {
    pub fn new(feeds: FeedStore, articles: ArticleStore, parser: P) -> Self {
        Self {
            feeds,
            articles,
            parser,
        }
    }

    /// Subscribe to a feed: parse it once and persist the feed with every
    /// item as a new unread article, in parser order.
    ///
    /// Fails with [`AggregatorError::FeedExists`] when the URL is already
    /// subscribed (checked up front, and again by the store to close the
    /// race against a concurrent add of the same URL). A parser failure
    /// aborts before anything is persisted. First ingestion does not
    /// deduplicate: every parsed item of a freshly created feed is new.
    pub async fn add_feed(&self, url: &str) -> Result<Feed, AggregatorError> {
        if let Some(existing) = self.feeds.get_by_url(url)? {
            return Err(AggregatorError::FeedExists(existing.url));
        }

        let parsed = self.parser.parse_feed(url).await?;

        let feed = match self.feeds.create(NewFeed {
            url: url.to_string(),
            title: parsed.title,
            description: parsed.description,
        }) {
            Ok(feed) => feed,
            Err(StoreError::FeedExists(url)) => return Err(AggregatorError::FeedExists(url)),
            Err(err) => return Err(err.into()),
        };

        info!(feed_id = feed.id, url = %feed.url, items = parsed.items.len(), "feed added");

        for item in parsed.items {
            self.articles.create(NewArticle {
                feed_id: feed.id,
                title: item.title,
                content: item.content,
                published: item.published,
            })?;
        }

        Ok(feed)
    }

    /// Re-ingest a feed: parse its stored URL and persist only the items
    /// whose titles are not already known for that feed.
    ///
    /// Titles match case-sensitively and exactly. A known title is skipped
    /// outright; content, publication date, and read state of the stored
    /// article stay as they are even when the feed's copy changed upstream
    /// (first write wins per title).
    pub async fn fetch_articles(&self, feed_id: i64) -> Result<(), AggregatorError> {
        let feed = self
            .feeds
            .get_by_id(feed_id)?
            .ok_or(AggregatorError::FeedNotFound(feed_id))?;

        let parsed = self.parser.parse_feed(&feed.url).await?;

        let known: HashSet<String> = self
            .articles
            .get_by_feed(feed_id)?
            .into_iter()
            .map(|article| article.title)
            .collect();

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        for item in parsed.items {
            if known.contains(&item.title) {
                skipped += 1;
                continue;
            }
            self.articles.create(NewArticle {
                feed_id,
                title: item.title,
                content: item.content,
                published: item.published,
            })?;
            inserted += 1;
        }

        debug!(feed_id, inserted, skipped, "feed reconciled");
        Ok(())
    }

    /// Reconcile every known feed, at most `concurrency` in flight at once.
    ///
    /// One feed's failure never aborts the others; each outcome is reported
    /// separately, in completion order.
    pub async fn refresh_all(&self, concurrency: usize) -> Result<Vec<RefreshOutcome>, AggregatorError> {
        let feeds = self.feeds.get_all()?;
        let outcomes: Vec<RefreshOutcome> = stream::iter(feeds.into_iter().map(|f| self.refresh_one(f)))
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;
        Ok(outcomes)
    }

    async fn refresh_one(&self, feed: Feed) -> RefreshOutcome {
        let result = self.fetch_articles(feed.id).await;
        if let Err(err) = &result {
            warn!(feed_id = feed.id, url = %feed.url, error = %err, "feed refresh failed");
        }
        RefreshOutcome {
            feed_id: feed.id,
            title: feed.title,
            result,
        }
    }

    /// All subscribed feeds; order is not significant.
    pub fn list_feeds(&self) -> Result<Vec<Feed>, AggregatorError> {
        Ok(self.feeds.get_all()?)
    }

    /// Articles for one feed, or every article when `feed_id` is `None`.
    pub fn list_articles(&self, feed_id: Option<i64>) -> Result<Vec<Article>, AggregatorError> {
        let articles = match feed_id {
            Some(id) => self.articles.get_by_feed(id)?,
            None => self.articles.get_all()?,
        };
        Ok(articles)
    }

    /// Mark an article as read. Idempotent on repeated calls.
    pub fn mark_read(&self, article_id: i64) -> Result<(), AggregatorError> {
        self.articles.mark_read(article_id).map_err(|err| match err {
            StoreError::ArticleNotFound(id) => AggregatorError::ArticleNotFound(id),
            other => AggregatorError::Storage(other),
        })
    }
}
