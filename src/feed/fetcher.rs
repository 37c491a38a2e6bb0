use std::future::Future;

use futures::StreamExt;
use thiserror::Error;
use tracing::debug;

use super::parser::{parse_bytes, ParsedFeed};

/// Default cap on feed response bodies.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10MB

/// Errors surfaced by a [`FeedParser`] implementation.
///
/// The aggregation core treats these as opaque and passes the message
/// through unmodified instead of reinterpreting it. Nothing here is retried
/// internally; re-invoking the whole operation is the caller's concern.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the configured size cap
    #[error("response too large")]
    ResponseTooLarge,
    /// Body could not be parsed as RSS or Atom
    #[error("parse error: {0}")]
    Parse(String),
}

/// The parsing capability the aggregation core depends on: turn a feed URL
/// into a [`ParsedFeed`]. The production implementation fetches over HTTP;
/// tests substitute scripted responses.
pub trait FeedParser {
    fn parse_feed(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<ParsedFeed, FetchError>> + Send;
}

/// Fetches feed XML over HTTP and parses it with feed-rs.
///
/// The client is shared and preconfigured (timeout, user agent) by the
/// caller. Response bodies are streamed against a size cap.
#[derive(Debug, Clone)]
pub struct HttpFeedParser {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFeedParser {
    pub fn new(client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }
}

impl FeedParser for HttpFeedParser {
    async fn parse_feed(&self, url: &str) -> Result<ParsedFeed, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, self.max_body_bytes).await?;
        debug!(url = %url, bytes = bytes.len(), "fetched feed body");

        parse_bytes(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: trust Content-Length when the server sends one
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Wire Feed</title>
    <description>Served over HTTP</description>
    <item><title>hello</title><description>world</description></item>
</channel></rss>"#;

    fn parser() -> HttpFeedParser {
        HttpFeedParser::new(reqwest::Client::new(), DEFAULT_MAX_BODY_BYTES)
    }

    #[tokio::test]
    async fn fetches_and_parses_a_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .mount(&server)
            .await;

        let parsed = parser()
            .parse_feed(&format!("{}/feed", server.uri()))
            .await
            .unwrap();

        assert_eq!(parsed.title, "Wire Feed");
        assert_eq!(parsed.description, "Served over HTTP");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].title, "hello");
        assert_eq!(parsed.items[0].content, "world");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = parser()
            .parse_feed(&format!("{}/feed", server.uri()))
            .await
            .unwrap_err();

        match err {
            FetchError::HttpStatus(404) => {}
            e => panic!("expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not valid xml"))
            .mount(&server)
            .await;

        let err = parser()
            .parse_feed(&format!("{}/feed", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
            .mount(&server)
            .await;

        let small = HttpFeedParser::new(reqwest::Client::new(), 1024);
        let err = small
            .parse_feed(&format!("{}/feed", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::ResponseTooLarge));
    }
}
