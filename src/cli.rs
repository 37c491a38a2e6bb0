//! Interactive command loop.
//!
//! This is the boundary layer: it validates raw input (URL syntax, numeric
//! IDs) before anything reaches the aggregation core, prints results, and
//! keeps going on errors. Command parsing is a pure function so it can be
//! tested without a terminal.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::aggregator::Aggregator;
use crate::feed::FeedParser;
use crate::storage::Article;

const HELP: &str = "\
Commands:
  add <url>          Subscribe to an RSS/Atom feed
  feeds              List subscribed feeds
  fetch <feed-id>    Reconcile one feed (insert unseen articles)
  refresh            Reconcile every feed
  articles [feed-id] List articles, optionally for one feed
  read <article-id>  Mark an article as read
  help               Show this help
  quit               Exit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add(String),
    Feeds,
    Fetch(i64),
    Refresh,
    Articles(Option<i64>),
    Read(i64),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` means a blank line.
    fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };

        let command = match word {
            "add" => {
                let raw = parts.next().ok_or("usage: add <url>")?;
                // Validate syntax only; the raw string stays the feed's identity
                url::Url::parse(raw).map_err(|e| format!("invalid URL: {}", e))?;
                Command::Add(raw.to_string())
            }
            "feeds" => Command::Feeds,
            "fetch" => Command::Fetch(parse_id(parts.next(), "usage: fetch <feed-id>")?),
            "refresh" => Command::Refresh,
            "articles" => match parts.next() {
                Some(raw) => Command::Articles(Some(parse_id(Some(raw), "usage: articles [feed-id]")?)),
                None => Command::Articles(None),
            },
            "read" => Command::Read(parse_id(parts.next(), "usage: read <article-id>")?),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {} (try 'help')", other)),
        };

        if parts.next().is_some() {
            return Err(format!("too many arguments for '{}'", word));
        }
        Ok(Some(command))
    }
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<i64, String> {
    let raw = raw.ok_or(usage)?;
    raw.parse::<i64>()
        .map_err(|_| format!("not a numeric ID: {}", raw))
}

/// Run the command loop until `quit` or end of input.
pub async fn run<P: FeedParser>(
    aggregator: &Aggregator<P>,
    refresh_concurrency: usize,
) -> Result<()> {
    println!("tidings: RSS aggregator (type 'help' for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush prompt")?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Add(url) => match aggregator.add_feed(&url).await {
                Ok(feed) => {
                    let count = aggregator
                        .list_articles(Some(feed.id))
                        .map(|articles| articles.len())
                        .unwrap_or(0);
                    println!("Added [{}] {} ({} articles)", feed.id, feed.title, count);
                }
                Err(err) => println!("error: {}", err),
            },
            Command::Feeds => match aggregator.list_feeds() {
                Ok(mut feeds) => {
                    if feeds.is_empty() {
                        println!("No feeds yet; try 'add <url>'");
                        continue;
                    }
                    feeds.sort_by_key(|f| f.id);
                    for feed in feeds {
                        println!("[{}] {}", feed.id, feed.title);
                        println!("    {}", feed.url);
                        if !feed.description.is_empty() {
                            println!("    {}", feed.description);
                        }
                    }
                }
                Err(err) => println!("error: {}", err),
            },
            Command::Fetch(feed_id) => match aggregator.fetch_articles(feed_id).await {
                Ok(()) => println!("Feed {} reconciled", feed_id),
                Err(err) => println!("error: {}", err),
            },
            Command::Refresh => match aggregator.refresh_all(refresh_concurrency).await {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        match outcome.result {
                            Ok(()) => println!("ok   [{}] {}", outcome.feed_id, outcome.title),
                            Err(err) => {
                                println!("fail [{}] {}: {}", outcome.feed_id, outcome.title, err)
                            }
                        }
                    }
                }
                Err(err) => println!("error: {}", err),
            },
            Command::Articles(feed_id) => match aggregator.list_articles(feed_id) {
                Ok(mut articles) => {
                    if articles.is_empty() {
                        println!("No articles");
                        continue;
                    }
                    articles.sort_by_key(|a| a.id);
                    for article in articles {
                        print_article(&article);
                    }
                }
                Err(err) => println!("error: {}", err),
            },
            Command::Read(article_id) => match aggregator.mark_read(article_id) {
                Ok(()) => println!("Article {} marked read", article_id),
                Err(err) => println!("error: {}", err),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn print_article(article: &Article) {
    let marker = if article.read { "*" } else { " " };
    println!("[{}] [{}] {}", marker, article.id, article.title);
    if let Some(published) = article.published {
        println!("      {}", published.format("%Y-%m-%d %H:%M"));
    }
    if !article.content.is_empty() {
        let mut preview: String = article.content.chars().take(100).collect();
        if article.content.chars().count() > 100 {
            preview.push_str("...");
        }
        println!("      {}", preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn add_requires_a_valid_url() {
        assert!(Command::parse("add").is_err());
        assert!(Command::parse("add not-a-url").is_err());

        let parsed = Command::parse("add https://example.com/feed.xml").unwrap();
        assert_eq!(
            parsed,
            Some(Command::Add("https://example.com/feed.xml".to_string()))
        );
    }

    #[test]
    fn fetch_and_read_require_numeric_ids() {
        assert!(Command::parse("fetch").is_err());
        assert!(Command::parse("fetch one").is_err());
        assert_eq!(Command::parse("fetch 3").unwrap(), Some(Command::Fetch(3)));
        assert_eq!(Command::parse("read 12").unwrap(), Some(Command::Read(12)));
    }

    #[test]
    fn articles_filter_is_optional() {
        assert_eq!(
            Command::parse("articles").unwrap(),
            Some(Command::Articles(None))
        );
        assert_eq!(
            Command::parse("articles 2").unwrap(),
            Some(Command::Articles(Some(2)))
        );
    }

    #[test]
    fn unknown_and_overlong_input_is_rejected() {
        assert!(Command::parse("frobnicate").is_err());
        assert!(Command::parse("feeds extra").is_err());
    }

    #[test]
    fn quit_has_an_alias() {
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }
}
