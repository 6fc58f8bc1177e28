//! Data models for feed sources, normalized articles, and the ranked digest.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Topic`]: The coarse category a feed source is filed under
//! - [`FeedSource`]: One entry of the feed registry
//! - [`Article`]: The canonical record produced for every feed item
//! - [`RankedDigest`]: The filtered, ordered, truncated output of one run
//!
//! Articles are created once by the normalizer and scoring engine and are
//! never mutated afterwards; renderers only ever see `&RankedDigest`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default priority weight for a source that does not declare one.
pub const DEFAULT_PRIORITY: u32 = 5;

/// Topic a feed source is filed under.
///
/// Serialized in lowercase (`"technology"`, `"science"`, ...) so it can be
/// written directly in YAML configuration and rendered as an RSS category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Technology,
    Science,
    Business,
    Politics,
    Software,
    Gadgets,
}

impl Topic {
    /// All topics in display order.
    pub const ALL: [Topic; 6] = [
        Topic::Technology,
        Topic::Science,
        Topic::Business,
        Topic::Politics,
        Topic::Software,
        Topic::Gadgets,
    ];

    /// Lowercase identifier used in feeds and CSS classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Technology => "technology",
            Topic::Science => "science",
            Topic::Business => "business",
            Topic::Politics => "politics",
            Topic::Software => "software",
            Topic::Gadgets => "gadgets",
        }
    }

    /// Human-readable label used in page footers and channel descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Technology => "Technology",
            Topic::Science => "Science",
            Topic::Business => "Business",
            Topic::Politics => "Politics",
            Topic::Software => "Software Development",
            Topic::Gadgets => "Gadgets",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured remote feed.
///
/// Defined once at startup (built-in registry or YAML) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedSource {
    /// URL of the RSS or Atom document.
    pub url: String,
    /// Topic every article from this source is filed under.
    pub topic: Topic,
    /// Display name, also matched against the reputable-source list.
    #[serde(rename = "source")]
    pub source_name: String,
    /// Weight added to the score of every article from this source.
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

impl FeedSource {
    pub fn new(url: &str, topic: Topic, source_name: &str, priority: u32) -> Self {
        Self {
            url: url.to_string(),
            topic,
            source_name: source_name.to_string(),
            priority,
        }
    }
}

/// A normalized, scored feed item.
///
/// # Invariants
///
/// * `title` is never empty (`"No Title"` when the feed omits it)
/// * `score` depends only on title, description, source name and priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Publication date exactly as the feed stated it (RFC-2822 or ISO-8601).
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub source: String,
    pub topic: Topic,
    pub score: i64,
}

/// The final ranked, truncated sequence of articles for one run.
///
/// Only [`crate::rank::rank`] constructs one, which guarantees every entry has
/// a strictly positive score, entries are in non-increasing score order with
/// ties kept in encounter order, and the length never exceeds the configured
/// maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedDigest {
    articles: Vec<Article>,
}

impl RankedDigest {
    pub(crate) fn from_ranked(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }
}

impl<'a> IntoIterator for &'a RankedDigest {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}
