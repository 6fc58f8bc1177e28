//! Declarative pattern tables driving the classifier and scoring engine.
//!
//! The built-in tables live here as plain string slices and are compiled into
//! a [`QualityRules`] value. Configuration may replace any table wholesale
//! (see [`RuleOverrides`]); the scoring code only ever sees the compiled value.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clickbait hooks, tested against the title in this order.
pub const CLICKBAIT_PATTERNS: &[&str] = &[
    r"you won't believe",
    r"this will shock you",
    r"what happens next",
    r"\d+ things you.*need",
    r"\d+ reasons why",
    r"the \w+est \w+ ever",
    r"\?.*!",
    r"^\d+\s+ways?\s+to",
    r"secret trick",
    r"doctors hate (him|her|this)",
    r"one weird trick",
    r"you'll never guess",
    r"this changes everything",
    r"mind.?blown",
    r"can we talk about",
    r"just wait until",
    r"wait for it",
    r"this is not a drill",
    r"breaking.*!",
    r"exclusive.*!",
];

/// Celebrity and gossip topics, tested against title and description.
pub const LOW_QUALITY_PATTERNS: &[&str] = &[
    r"celebrity",
    r"gossip",
    r"kardashian",
    r"bachelor",
    r"love island",
    r"real housewives",
];

/// Substrings of source names that earn the reputation bonus.
pub const REPUTABLE_SOURCES: &[&str] = &["Reuters", "BBC", "Nature", "Science Daily", "Hacker News"];

/// Topical vocabulary boosts as `(pattern, delta)`.
pub const KEYWORD_BOOSTS: &[(&str, i64)] = &[
    (
        r"\b(ai|artificial intelligence|machine learning|llms?|large language models?|gpt|neural networks?|openai|anthropic)\b",
        8,
    ),
    (
        r"\b(rust|python|programming|open.?source|developers?|compilers?|github|software engineering|coding)\b",
        5,
    ),
];

/// Errors raised while compiling pattern tables.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid {table} pattern `{pattern}`: {source}")]
    InvalidPattern {
        table: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A topical keyword pattern and the score it adds when matched.
#[derive(Debug, Clone)]
pub struct KeywordBoost {
    pub pattern: Regex,
    pub delta: i64,
}

/// Compiled, immutable pattern tables.
///
/// Every regex is case-insensitive. Table order is preserved, which matters
/// only for short-circuiting classifiers; the score itself is order-free.
#[derive(Debug, Clone)]
pub struct QualityRules {
    pub clickbait: Vec<Regex>,
    pub low_quality: Vec<Regex>,
    pub reputable_sources: Vec<String>,
    pub keyword_boosts: Vec<KeywordBoost>,
}

static BUILTIN: Lazy<QualityRules> = Lazy::new(|| {
    QualityRules::from_overrides(&RuleOverrides::default())
        .expect("built-in quality patterns must compile")
});

impl Default for QualityRules {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

/// Keyword boost as written in YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordBoostSpec {
    pub pattern: String,
    pub delta: i64,
}

/// Optional replacements for the built-in tables, read from configuration.
///
/// A table left as `None` keeps its built-in contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleOverrides {
    pub clickbait: Option<Vec<String>>,
    pub low_quality: Option<Vec<String>>,
    pub reputable_sources: Option<Vec<String>>,
    pub keyword_boosts: Option<Vec<KeywordBoostSpec>>,
}

impl QualityRules {
    /// Compile the built-in tables with any configured replacements applied.
    pub fn from_overrides(overrides: &RuleOverrides) -> Result<Self, RuleError> {
        let clickbait = match &overrides.clickbait {
            Some(list) => compile_all("clickbait", list.iter().map(String::as_str))?,
            None => compile_all("clickbait", CLICKBAIT_PATTERNS.iter().copied())?,
        };
        let low_quality = match &overrides.low_quality {
            Some(list) => compile_all("low_quality", list.iter().map(String::as_str))?,
            None => compile_all("low_quality", LOW_QUALITY_PATTERNS.iter().copied())?,
        };
        let reputable_sources = overrides
            .reputable_sources
            .clone()
            .unwrap_or_else(|| REPUTABLE_SOURCES.iter().map(|s| s.to_string()).collect());
        let keyword_boosts = match &overrides.keyword_boosts {
            Some(list) => list
                .iter()
                .map(|b| {
                    Ok(KeywordBoost {
                        pattern: compile("keyword_boosts", &b.pattern)?,
                        delta: b.delta,
                    })
                })
                .collect::<Result<Vec<_>, RuleError>>()?,
            None => KEYWORD_BOOSTS
                .iter()
                .map(|(pattern, delta)| {
                    Ok(KeywordBoost {
                        pattern: compile("keyword_boosts", pattern)?,
                        delta: *delta,
                    })
                })
                .collect::<Result<Vec<_>, RuleError>>()?,
        };

        Ok(Self {
            clickbait,
            low_quality,
            reputable_sources,
            keyword_boosts,
        })
    }
}

fn compile(table: &'static str, pattern: &str) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RuleError::InvalidPattern {
            table,
            pattern: pattern.to_string(),
            source,
        })
}

fn compile_all<'a>(
    table: &'static str,
    patterns: impl Iterator<Item = &'a str>,
) -> Result<Vec<Regex>, RuleError> {
    patterns.map(|p| compile(table, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let rules = QualityRules::default();
        assert_eq!(rules.clickbait.len(), CLICKBAIT_PATTERNS.len());
        assert_eq!(rules.low_quality.len(), LOW_QUALITY_PATTERNS.len());
        assert_eq!(rules.reputable_sources.len(), REPUTABLE_SOURCES.len());
        assert_eq!(rules.keyword_boosts.len(), 2);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let rules = QualityRules::default();
        assert!(rules.clickbait[0].is_match("YOU WON'T BELIEVE it"));
        assert!(rules.low_quality[2].is_match("The KARDASHIAN saga"));
    }

    #[test]
    fn test_override_replaces_only_named_table() {
        let overrides = RuleOverrides {
            low_quality: Some(vec!["crypto pump".to_string()]),
            ..Default::default()
        };
        let rules = QualityRules::from_overrides(&overrides).unwrap();
        assert_eq!(rules.low_quality.len(), 1);
        assert_eq!(rules.clickbait.len(), CLICKBAIT_PATTERNS.len());
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let overrides = RuleOverrides {
            clickbait: Some(vec!["(unclosed".to_string()]),
            ..Default::default()
        };
        let err = QualityRules::from_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("clickbait"));
    }

    #[test]
    fn test_overrides_deserialize_from_yaml() {
        let yaml = "reputable_sources: [\"AP\"]\nkeyword_boosts:\n  - pattern: rust\n    delta: 3\n";
        let overrides: RuleOverrides = serde_yaml::from_str(yaml).unwrap();
        let rules = QualityRules::from_overrides(&overrides).unwrap();
        assert_eq!(rules.reputable_sources, vec!["AP".to_string()]);
        assert_eq!(rules.keyword_boosts[0].delta, 3);
    }
}
