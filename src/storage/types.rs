use chrono::{DateTime, Utc};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Store-level errors shared by [`FeedStore`] and [`ArticleStore`].
///
/// Reads that find nothing return `Ok(None)` / an empty `Vec`, not an error;
/// these variants cover genuine contract violations.
///
/// [`FeedStore`]: super::FeedStore
/// [`ArticleStore`]: super::ArticleStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// A feed with this URL is already stored (URL is the feed's identity)
    #[error("feed with URL {0} already exists")]
    FeedExists(String),

    /// No article with this ID exists
    #[error("article with ID {0} not found")]
    ArticleNotFound(i64),

    /// A writer panicked while holding the store lock, so the state
    /// can no longer be trusted
    #[error("store lock poisoned by a panicked writer")]
    Poisoned,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A subscribed feed as stored.
///
/// `id` is a surrogate key assigned by the store, starting at 1 and strictly
/// increasing; it is never reused or mutated. The URL is the feed's natural
/// identity and unique across the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Input for creating a feed; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewFeed {
    pub url: String,
    pub title: String,
    pub description: String,
}

/// An article as stored.
///
/// Articles are deduplicated per feed by exact title, but that policy lives
/// in the use-case layer; the store accepts whatever it is given. `read` is
/// the only field that changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub feed_id: i64,
    pub title: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
    pub read: bool,
}

/// Input for creating an article; created unread, the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub feed_id: i64,
    pub title: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}
