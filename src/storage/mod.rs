//! In-memory storage for feeds and articles.
//!
//! Each store owns its state behind a reader-writer lock and hands out
//! independent copies on read, so callers can never mutate stored records
//! through a returned value. Mutation goes only through `create` and
//! `mark_read`. A durable engine replacing these stores must preserve the
//! same two tables, their fields, and the identity invariants (unique feed
//! URL, per-feed article titles).

mod articles;
mod feeds;
mod types;

pub use articles::ArticleStore;
pub use feeds::FeedStore;
pub use types::{Article, Feed, NewArticle, NewFeed, StoreError};
