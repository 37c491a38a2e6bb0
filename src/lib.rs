//! tidings is an RSS aggregator that never ingests the same article twice.
//!
//! The crate is organized around a small aggregation core and its ports:
//!
//! - [`storage`] - concurrency-safe in-memory stores for feeds and articles,
//!   with unique feed URLs and monotonic surrogate IDs
//! - [`feed`] - the [`feed::FeedParser`] port plus the HTTP + feed-rs
//!   implementation
//! - [`aggregator`] - the use cases: subscribe, reconcile, list, mark read
//! - [`cli`] / [`config`] - the interactive boundary and its configuration

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod feed;
pub mod storage;

pub use aggregator::{Aggregator, AggregatorError};
