//! One batch run: fetch every source, aggregate, rank.

use crate::config::DigestConfig;
use crate::feeds::fetch_all;
use crate::models::RankedDigest;
use crate::quality::QualityRules;
use crate::rank::{aggregate, rank};
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{info, instrument};

/// What a run produced, with the counts worth reporting.
#[derive(Debug)]
pub struct RunReport {
    /// Articles collected before filtering.
    pub fetched: usize,
    /// Names of sources that contributed nothing because they failed.
    pub failed_sources: Vec<String>,
    pub digest: RankedDigest,
}

/// Fetch the configured registry and rank the result.
///
/// `now` is the run clock; it stamps dateless entries.
#[instrument(level = "info", skip_all, fields(feeds = config.feeds.len(), max_articles = config.max_articles))]
pub async fn run(
    config: &DigestConfig,
    rules: &QualityRules,
    client: &Client,
    now: DateTime<Utc>,
) -> RunReport {
    let outcomes = fetch_all(client, &config.feeds, rules, now, config.fetch.concurrency).await;
    let aggregate = aggregate(outcomes);
    let fetched = aggregate.articles.len();
    info!(fetched, failed = aggregate.failed_sources.len(), "Total articles fetched");

    let digest = rank(aggregate.articles, config.max_articles);
    info!(retained = digest.len(), "Articles after filtering");

    RunReport {
        fetched,
        failed_sources: aggregate.failed_sources,
        digest,
    }
}
