//! Output generation for the RSS feed, HTML page and optional JSON dump.
//!
//! # Submodules
//!
//! - [`rss`]: Renders the digest as an RSS 2.0 document
//! - [`html`]: Renders the digest as a static HTML page
//! - [`json`]: Serializes the digest for API consumption
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── feed.xml
//! ├── index.html
//! └── digest.json   # only with --json
//! ```

pub mod html;
pub mod json;
pub mod rss;

use crate::config::ChannelSettings;
use crate::models::{RankedDigest, Topic};
use crate::utils::ensure_writable_dir;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const FEED_FILE: &str = "feed.xml";
pub const PAGE_FILE: &str = "index.html";

/// Render and write every artifact for one run.
///
/// # Arguments
///
/// * `digest` - The ranked articles
/// * `channel` - Channel title, links and description for the feed and page
/// * `topics` - Topics listed in the channel description and page footer
/// * `built_at` - Build instant; `lastBuildDate` and the fallback article date
/// * `output_dir` - Directory receiving the files, created if missing
/// * `with_json` - Also write `digest.json`
///
/// # Errors
///
/// Returns the first failure: an unwritable directory, a rendering error or a
/// failed file write. Files written before the failure are left in place.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), articles = digest.len()))]
pub async fn write_all(
    digest: &RankedDigest,
    channel: &ChannelSettings,
    topics: &[Topic],
    built_at: &DateTime<Utc>,
    output_dir: &Path,
    with_json: bool,
) -> Result<(), Box<dyn Error>> {
    ensure_writable_dir(output_dir).await?;

    let feed_path = output_dir.join(FEED_FILE);
    fs::write(&feed_path, rss::render_feed(digest, channel, topics, built_at)?).await?;
    info!(path = %feed_path.display(), "✅ Feed generated");

    let page_path = output_dir.join(PAGE_FILE);
    fs::write(&page_path, html::render_page(digest, channel, topics, built_at)?).await?;
    info!(path = %page_path.display(), "✅ HTML page generated");

    if with_json {
        json::write_digest(digest, built_at, output_dir).await?;
    }
    Ok(())
}
