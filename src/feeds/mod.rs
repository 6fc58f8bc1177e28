//! Feed ingestion: fetching, parsing and normalizing remote feeds.
//!
//! # Submodules
//!
//! - [`xml`]: Builds an attribute-aware element tree from raw XML
//! - [`raw`]: Finds RSS items / Atom entries and exposes their loosely-typed fields
//! - [`normalize`]: Turns each raw entry into a scored [`Article`]
//! - [`fetch`]: Downloads every registered feed with bounded concurrency
//!
//! # Flow
//!
//! ```text
//! FeedSource ──fetch──▶ body ──xml──▶ XmlNode ──raw──▶ Vec<RawFeedItem> ──normalize──▶ Vec<Article>
//! ```
//!
//! A failure anywhere before `normalize` is confined to its source; the
//! source then contributes no articles.

pub mod fetch;
pub mod normalize;
pub mod raw;
pub mod xml;

use crate::models::{Article, FeedSource};
use crate::quality::QualityRules;
use chrono::{DateTime, Utc};

pub use fetch::{FeedOutcome, build_client, fetch_all};
pub use xml::XmlError;

/// Parse a feed payload and normalize every entry it contains.
///
/// Entries come back in document order. Only a malformed document is an
/// error; any well-formed document, even one with no entries, succeeds.
pub fn ingest(
    body: &str,
    source: &FeedSource,
    rules: &QualityRules,
    now: DateTime<Utc>,
) -> Result<Vec<Article>, XmlError> {
    let root = xml::parse_document(body)?;
    Ok(raw::extract_items(&root)
        .iter()
        .map(|item| normalize::normalize_item(item, source, rules, now))
        .collect())
}
