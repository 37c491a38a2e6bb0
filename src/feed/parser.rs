use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

/// A parsed feed document: channel metadata plus its items, in document
/// order. Transient: produced per fetch, consumed once, never stored.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub title: String,
    pub description: String,
    pub items: Vec<ParsedItem>,
}

/// One item of a parsed feed. Carries no identity of its own; the
/// reconcile step decides whether it is new by title.
#[derive(Debug, Clone)]
pub struct ParsedItem {
    pub title: String,
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}

/// Parse RSS or Atom XML into a [`ParsedFeed`].
///
/// Field mapping follows what feeds provide in practice: item content falls
/// back to the summary when the document has no content block, and the
/// publication date falls back to the updated timestamp. Items without a
/// title keep an empty string rather than being dropped.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let content = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();
            ParsedItem {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                content,
                published: entry.published.or(entry.updated),
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        description: feed.description.map(|t| t.content).unwrap_or_default(),
        items,
    })
}
