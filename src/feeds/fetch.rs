//! HTTP fetching of registered feeds.
//!
//! Every source is fetched once, with no retries. Sources run concurrently up
//! to a fixed limit, each with its own timeout, and each lands in its own
//! result slot. Slots come back in registry order, so the article sequence
//! handed to ranking is the same one a sequential run would produce.

use super::{XmlError, ingest};
use crate::config::FetchSettings;
use crate::models::{Article, FeedSource};
use crate::quality::QualityRules;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Why a source contributed no articles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("timeout")]
    Timeout,
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    HttpStatus(u16),
    /// DNS, connection, TLS, redirect or body errors.
    #[error("request failed: {0}")]
    Network(reqwest::Error),
    /// The body was not a well-formed XML document.
    #[error("parse error: {0}")]
    Parse(#[from] XmlError),
}

impl FetchError {
    /// Short label for log lines: `timeout`, `HTTP 404`, `parse` or `network`.
    pub fn reason(&self) -> String {
        match self {
            FetchError::Timeout => "timeout".to_string(),
            FetchError::HttpStatus(code) => format!("HTTP {code}"),
            FetchError::Network(_) => "network".to_string(),
            FetchError::Parse(_) => "parse".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

/// Result of fetching and ingesting one source.
#[derive(Debug)]
pub struct FeedOutcome {
    pub source: FeedSource,
    pub result: Result<Vec<Article>, FetchError>,
}

/// Build the shared HTTP client: user agent, per-request timeout, redirect cap.
pub fn build_client(settings: &FetchSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
        .build()
}

/// Download one feed body.
async fn fetch_body(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Fetch, parse and normalize a single source.
///
/// One GET request, no retries. The body is parsed and every entry is turned
/// into a scored [`Article`].
///
/// # Arguments
///
/// * `client` - Shared client carrying the timeout, user agent and redirect cap
/// * `source` - The registry entry to fetch
/// * `rules` - Compiled quality rules used for scoring
/// * `now` - Run clock, stamped on entries without a date
///
/// # Returns
///
/// A [`FeedOutcome`] holding either the source's articles in document order
/// or the [`FetchError`] that stopped it. Failures are logged with their
/// [`FetchError::reason`] and never propagate.
#[instrument(level = "info", skip_all, fields(source = %source.source_name))]
pub async fn fetch_source(
    client: &Client,
    source: &FeedSource,
    rules: &QualityRules,
    now: DateTime<Utc>,
) -> FeedOutcome {
    let t0 = Instant::now();
    debug!(url = %source.url, "Fetching feed");

    let result = match fetch_body(client, &source.url).await {
        Ok(body) => ingest(&body, source, rules, now).map_err(FetchError::from),
        Err(e) => Err(e),
    };

    let elapsed_ms = t0.elapsed().as_millis();
    match &result {
        Ok(articles) => info!(
            count = articles.len(),
            elapsed_ms,
            "✓ {} - fetched successfully",
            source.source_name
        ),
        Err(e) => warn!(
            reason = %e.reason(),
            error = %e,
            elapsed_ms,
            "✗ {} - {}",
            source.source_name,
            e
        ),
    }

    FeedOutcome {
        source: source.clone(),
        result,
    }
}

/// Fetch every source with at most `concurrency` requests in flight.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `sources` - The feed registry
/// * `rules` - Compiled quality rules used for scoring
/// * `now` - Run clock passed to every source
/// * `concurrency` - In-flight limit; `0` is treated as `1`
///
/// # Returns
///
/// One [`FeedOutcome`] per source, in the same order as `sources`, whatever
/// order the requests complete in.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), concurrency = concurrency))]
pub async fn fetch_all(
    client: &Client,
    sources: &[FeedSource],
    rules: &QualityRules,
    now: DateTime<Utc>,
    concurrency: usize,
) -> Vec<FeedOutcome> {
    stream::iter(sources)
        .map(|source| fetch_source(client, source, rules, now))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><title>Compiler team ships faster incremental builds</title><link>https://example.com/a</link></item>
  <item><title>Battery research reaches new density record</title><link>https://example.com/b</link></item>
</channel></rss>"#;

    fn settings(timeout_secs: u64) -> FetchSettings {
        FetchSettings {
            timeout_secs,
            ..FetchSettings::default()
        }
    }

    fn source_at(server: &MockServer, route: &str, name: &str) -> FeedSource {
        FeedSource::new(&format!("{}{}", server.uri(), route), Topic::Technology, name, 5)
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&server)
            .await;

        let client = build_client(&settings(5)).unwrap();
        let outcome = fetch_source(
            &client,
            &source_at(&server, "/ok", "Mock"),
            &QualityRules::default(),
            Utc::now(),
        )
        .await;

        let articles = outcome.result.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_fetch_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&settings(5)).unwrap();
        let outcome = fetch_source(
            &client,
            &source_at(&server, "/missing", "Mock"),
            &QualityRules::default(),
            Utc::now(),
        )
        .await;

        assert!(matches!(outcome.result, Err(FetchError::HttpStatus(404))));
        assert_eq!(outcome.result.as_ref().unwrap_err().reason(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_fetch_malformed_feed_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not valid xml"))
            .mount(&server)
            .await;

        let client = build_client(&settings(5)).unwrap();
        let outcome = fetch_source(
            &client,
            &source_at(&server, "/broken", "Mock"),
            &QualityRules::default(),
            Utc::now(),
        )
        .await;

        assert!(matches!(outcome.result, Err(FetchError::Parse(_))));
        assert_eq!(outcome.result.unwrap_err().reason(), "parse");
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = build_client(&settings(1)).unwrap();
        let outcome = fetch_source(
            &client,
            &source_at(&server, "/slow", "Mock"),
            &QualityRules::default(),
            Utc::now(),
        )
        .await;

        assert!(matches!(outcome.result, Err(FetchError::Timeout)));
        assert_eq!(FetchError::Timeout.to_string(), "timeout");
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures_and_keeps_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sources = vec![
            source_at(&server, "/bad", "Broken"),
            source_at(&server, "/good", "Working"),
            source_at(&server, "/bad", "Broken Again"),
        ];
        let client = build_client(&settings(5)).unwrap();
        let outcomes = fetch_all(&client, &sources, &QualityRules::default(), Utc::now(), 2).await;

        let names: Vec<&str> = outcomes.iter().map(|o| o.source.source_name.as_str()).collect();
        assert_eq!(names, vec!["Broken", "Working", "Broken Again"]);
        assert!(matches!(outcomes[0].result, Err(FetchError::HttpStatus(500))));
        assert_eq!(outcomes[1].result.as_ref().unwrap().len(), 2);
        assert!(outcomes[2].result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_all_empty_registry() {
        let client = build_client(&FetchSettings::default()).unwrap();
        let outcomes = fetch_all(&client, &[], &QualityRules::default(), Utc::now(), 4).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = build_client(&settings(5)).unwrap();
        let source = FeedSource::new("http://127.0.0.1:9/feed", Topic::Science, "Nowhere", 5);
        let outcome = fetch_source(&client, &source, &QualityRules::default(), Utc::now()).await;
        assert!(matches!(outcome.result, Err(FetchError::Network(_))));
    }
}
