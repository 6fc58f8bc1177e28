//! Turns raw feed entries into canonical [`Article`]s.
//!
//! Normalization never fails. Missing or oddly-shaped fields fall back to
//! defaults instead of raising.

use super::raw::{RawFeedItem, RawField};
use crate::models::{Article, FeedSource};
use crate::quality::scoring::breakdown;
use crate::quality::{QualityRules, score};
use crate::utils::truncate_for_log;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{Level, debug, enabled};

pub const NO_TITLE: &str = "No Title";

/// Build one scored article from a raw entry.
///
/// `now` is the run's clock instant. It becomes the publication date of
/// entries that state none, so every dateless entry in a run shares one
/// timestamp and tests can pin it.
pub fn normalize_item(
    item: &RawFeedItem,
    source: &FeedSource,
    rules: &QualityRules,
    now: DateTime<Utc>,
) -> Article {
    let title = title_of(item);
    let link = link_of(item);
    let description = description_of(item);
    let pub_date = pub_date_of(item)
        .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

    let score = score(rules, &title, &description, &source.source_name, source.priority);
    if enabled!(Level::DEBUG) {
        let signals = breakdown(rules, &title, &description, &source.source_name, source.priority);
        debug!(
            source = %source.source_name,
            title = %truncate_for_log(&title, 60),
            score,
            ?signals,
            "Scored article"
        );
    }

    Article {
        title,
        link,
        description,
        pub_date,
        source: source.source_name.clone(),
        topic: source.topic,
        score,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

fn title_of(item: &RawFeedItem) -> String {
    item.title
        .as_ref()
        .and_then(|f| non_empty(f.inner_text()))
        .unwrap_or(NO_TITLE)
        .to_string()
}

/// Plain text, then element text, then `href`, then the entry identifier.
fn link_of(item: &RawFeedItem) -> String {
    let from_link = item.link.as_ref().and_then(|f| match f {
        RawField::Text(s) => non_empty(s),
        RawField::Node(_) => non_empty(f.inner_text()).or_else(|| f.href().and_then(non_empty)),
    });

    from_link
        .or_else(|| item.id.as_ref().and_then(|f| non_empty(f.inner_text())))
        .unwrap_or_default()
        .to_string()
}

fn description_of(item: &RawFeedItem) -> String {
    [&item.description, &item.summary, &item.content]
        .into_iter()
        .flatten()
        .find_map(|f| non_empty(f.inner_text()))
        .unwrap_or_default()
        .to_string()
}

fn pub_date_of(item: &RawFeedItem) -> Option<String> {
    [&item.pub_date, &item.published, &item.updated]
        .into_iter()
        .flatten()
        .find_map(|f| non_empty(f.inner_text()))
        .map(str::to_string)
}
