//! # Morning Digest
//!
//! A personal news aggregator that fetches a fixed registry of RSS/Atom
//! feeds, scores every entry with a heuristic quality model, and publishes
//! the best of them as a regenerated RSS feed and a static HTML page.
//!
//! ## Features
//!
//! - Fetches all feeds concurrently with a bounded in-flight limit and a
//!   per-request timeout; one failing feed never blocks the rest
//! - Normalizes RSS 2.0, RSS 1.0 and Atom entries into one article shape
//! - Penalizes clickbait and gossip, rewards reputable sources, topical
//!   keywords and well-sized titles and descriptions
//! - Writes `feed.xml` and `index.html`, and optionally `digest.json`
//!
//! ## Usage
//!
//! ```sh
//! morning_digest -o ./docs
//! ```
//!
//! ## Architecture
//!
//! The application is a single batch run:
//! 1. **Fetching**: Download every registered feed
//! 2. **Normalizing**: Parse each payload and build scored articles
//! 3. **Ranking**: Drop non-positive scores, sort best first, truncate
//! 4. **Output**: Render and write the feed, page and optional JSON

use chrono::Utc;
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod feeds;
mod models;
mod outputs;
mod pipeline;
mod quality;
mod rank;
mod utils;

use cli::Cli;
use config::DigestConfig;
use models::RankedDigest;
use utils::truncate_chars;

const TOP_PREVIEW: usize = 10;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("morning_digest starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };
    let rules = config.quality_rules()?;
    info!(
        feeds = config.feeds.len(),
        max_articles = config.max_articles,
        concurrency = config.fetch.concurrency,
        "Configuration loaded"
    );

    // Fail before fetching anything if the output can't be written.
    if let Err(e) = utils::ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch, normalize, rank ----
    let now = Utc::now();
    let client = feeds::build_client(&config.fetch)?;
    let report = pipeline::run(&config, &rules, &client, now).await;

    info!(
        fetched = report.fetched,
        retained = report.digest.len(),
        failed_sources = report.failed_sources.len(),
        "Run summary"
    );
    if !report.failed_sources.is_empty() {
        info!(sources = %report.failed_sources.join(", "), "Sources without articles");
    }
    log_topic_distribution(&report.digest);
    log_top_articles(&report.digest);

    // ---- Output ----
    if let Err(e) = outputs::write_all(
        &report.digest,
        &config.channel,
        &config.topics(),
        &now,
        &args.output_dir,
        args.json,
    )
    .await
    {
        error!(error = %e, "Failed to write outputs");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Built-in defaults or the YAML file, with CLI overrides applied on top.
fn load_config(args: &Cli) -> Result<DigestConfig, Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            DigestConfig::load(path)?
        }
        None => DigestConfig::default(),
    };
    Ok(base.with_overrides(args.max_articles, args.concurrency)?)
}

fn log_topic_distribution(digest: &RankedDigest) {
    let counts = digest.iter().counts_by(|a| a.topic);
    for (topic, count) in counts.into_iter().sorted() {
        info!(topic = %topic, count, "Topic distribution");
    }
}

fn log_top_articles(digest: &RankedDigest) {
    for (i, a) in digest.iter().take(TOP_PREVIEW).enumerate() {
        info!(
            "{}. [{}] {}... ({}, score: {})",
            i + 1,
            a.topic.as_str().to_uppercase(),
            truncate_chars(&a.title, 70),
            a.source,
            a.score
        );
    }
}
