//! Feed retrieval and parsing.
//!
//! The aggregation core consumes feeds through the [`FeedParser`] trait:
//! an opaque, synchronous-in-spirit capability that turns a URL into a
//! [`ParsedFeed`]. The submodules provide the production implementation:
//!
//! - [`parser`] - RSS/Atom XML into structured items via `feed-rs`
//! - [`fetcher`] - HTTP retrieval with a body size cap, implementing the trait

mod fetcher;
mod parser;

pub use fetcher::{FeedParser, FetchError, HttpFeedParser, DEFAULT_MAX_BODY_BYTES};
pub use parser::{parse_bytes, ParsedFeed, ParsedItem};
