//! Run configuration: feed registry, limits, fetch settings and channel metadata.
//!
//! A [`DigestConfig`] is built once at startup, either from the built-in
//! defaults or from a YAML file, and then passed by reference into the
//! pipeline. Nothing in it changes during a run.
//!
//! # YAML
//!
//! Every key is optional; anything left out keeps its default.
//!
//! ```yaml
//! max_articles: 40
//! fetch:
//!   timeout_secs: 15
//!   concurrency: 4
//! feeds:
//!   - url: https://www.nature.com/nature.rss
//!     topic: science
//!     source: Nature
//!     priority: 8
//! rules:
//!   reputable_sources: ["Nature", "Reuters"]
//! ```

use crate::models::{FeedSource, Topic};
use crate::quality::QualityRules;
use crate::quality::rules::{RuleError, RuleOverrides};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("feed `{source_name}` has an invalid URL `{url}`: {reason}")]
    InvalidFeedUrl {
        source_name: String,
        url: String,
        reason: String,
    },
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// HTTP settings shared by every feed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    /// Maximum number of feeds fetched at the same time.
    pub concurrency: usize,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            concurrency: 6,
            user_agent: "Morning-Digest/1.0 (Personal News Aggregator)".to_string(),
            max_redirects: 5,
        }
    }
}

/// Metadata for the published RSS channel and HTML page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelSettings {
    pub title: String,
    pub link: String,
    /// Public URL of the generated `feed.xml`.
    pub feed_url: String,
    pub description: String,
    pub language: String,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            title: "Morning Digest - Personalized News".to_string(),
            link: "https://example.github.io/morning-digest/".to_string(),
            feed_url: "https://example.github.io/morning-digest/feed.xml".to_string(),
            description: "Your personalized morning news digest with clickbait filtering.".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Upper bound on the number of articles in the digest.
    pub max_articles: usize,
    pub fetch: FetchSettings,
    pub channel: ChannelSettings,
    pub feeds: Vec<FeedSource>,
    pub rules: RuleOverrides,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_articles: 30,
            fetch: FetchSettings::default(),
            channel: ChannelSettings::default(),
            feeds: default_feeds(),
            rules: RuleOverrides::default(),
        }
    }
}

/// The built-in feed registry.
pub fn default_feeds() -> Vec<FeedSource> {
    use Topic::*;
    vec![
        FeedSource::new("https://www.theverge.com/rss/index.xml", Technology, "The Verge", 5),
        FeedSource::new("https://techcrunch.com/feed/", Technology, "TechCrunch", 5),
        FeedSource::new("https://www.wired.com/feed/rss", Technology, "Wired", 5),
        FeedSource::new("https://feeds.arstechnica.com/arstechnica/index", Technology, "Ars Technica", 7),
        FeedSource::new("https://www.sciencedaily.com/rss/all.xml", Science, "Science Daily", 7),
        FeedSource::new("https://www.nature.com/nature.rss", Science, "Nature", 8),
        FeedSource::new("https://feeds.bbci.co.uk/news/business/rss.xml", Business, "BBC Business", 7),
        FeedSource::new("http://feeds.reuters.com/reuters/businessNews", Business, "Reuters", 8),
        FeedSource::new("https://feeds.bbci.co.uk/news/politics/rss.xml", Politics, "BBC Politics", 7),
        FeedSource::new("https://www.politico.com/rss/politicopicks.xml", Politics, "Politico", 5),
        FeedSource::new("https://news.ycombinator.com/rss", Software, "Hacker News", 7),
        FeedSource::new("https://dev.to/feed", Software, "Dev.to", 5),
        FeedSource::new("https://gizmodo.com/rss", Gadgets, "Gizmodo", 3),
        FeedSource::new("https://www.engadget.com/rss.xml", Gadgets, "Engadget", 4),
    ]
}

impl DigestConfig {
    /// Load configuration from a YAML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text and validate it.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: DigestConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check limits and feed URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_articles == 0 {
            return Err(ConfigError::ZeroLimit("max_articles"));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::ZeroLimit("fetch.concurrency"));
        }
        for feed in &self.feeds {
            let invalid = |reason: String| ConfigError::InvalidFeedUrl {
                source_name: feed.source_name.clone(),
                url: feed.url.clone(),
                reason,
            };
            let url = Url::parse(&feed.url).map_err(|e| invalid(e.to_string()))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
            }
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(
        mut self,
        max_articles: Option<usize>,
        concurrency: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(n) = max_articles {
            self.max_articles = n;
        }
        if let Some(n) = concurrency {
            self.fetch.concurrency = n;
        }
        self.validate()?;
        Ok(self)
    }

    /// Compile the quality rules with this configuration's overrides applied.
    pub fn quality_rules(&self) -> Result<QualityRules, ConfigError> {
        Ok(QualityRules::from_overrides(&self.rules)?)
    }

    /// Topics covered by the registry, in display order.
    pub fn topics(&self) -> Vec<Topic> {
        Topic::ALL
            .into_iter()
            .filter(|t| self.feeds.iter().any(|f| f.topic == *t))
            .collect()
    }
}
