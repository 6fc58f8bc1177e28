//! Article scoring.
//!
//! A score is the plain sum of independent signals. Every predicate is
//! evaluated, none short-circuits another, and there is no floor or ceiling.
//!
//! | Signal | Condition | Delta |
//! |--------|-----------|-------|
//! | Base | always | `+priority` |
//! | Clickbait | [`is_clickbait`] | −50 |
//! | Low quality | [`is_low_quality`] | −30 |
//! | Reputable source | source name contains an allow-listed name | +10 |
//! | Keyword boost | title or description matches a boost pattern | per pattern |
//! | Substantive description | more than 200 characters | +5 |
//! | Well-bounded title | 31..=99 characters | +5 |
//! | Short title | fewer than 20 characters | −5 |
//! | Long title | more than 120 characters | −5 |

use super::classifier::{is_clickbait, is_low_quality};
use super::rules::QualityRules;

const CLICKBAIT_PENALTY: i64 = -50;
const LOW_QUALITY_PENALTY: i64 = -30;
const REPUTABLE_BONUS: i64 = 10;
const LENGTH_DELTA: i64 = 5;

const SUBSTANTIVE_DESCRIPTION: usize = 200;
const TITLE_SHORT: usize = 20;
const TITLE_LONG: usize = 120;
const TITLE_BOUNDED_MIN: usize = 30;
const TITLE_BOUNDED_MAX: usize = 100;

/// Per-signal contributions to one article's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub priority: i64,
    pub clickbait: i64,
    pub low_quality: i64,
    pub reputable: i64,
    pub keywords: i64,
    pub description: i64,
    pub title_length: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.priority
            + self.clickbait
            + self.low_quality
            + self.reputable
            + self.keywords
            + self.description
            + self.title_length
    }
}

/// Compute every signal for an article.
///
/// Lengths are counted in characters, not bytes.
pub fn breakdown(
    rules: &QualityRules,
    title: &str,
    description: &str,
    source: &str,
    priority: u32,
) -> ScoreBreakdown {
    let mut b = ScoreBreakdown {
        priority: i64::from(priority),
        ..Default::default()
    };

    if is_clickbait(rules, title, description) {
        b.clickbait = CLICKBAIT_PENALTY;
    }
    if is_low_quality(rules, title, description) {
        b.low_quality = LOW_QUALITY_PENALTY;
    }
    if rules
        .reputable_sources
        .iter()
        .any(|name| source.contains(name.as_str()))
    {
        b.reputable = REPUTABLE_BONUS;
    }

    b.keywords = rules
        .keyword_boosts
        .iter()
        .filter(|k| k.pattern.is_match(title) || k.pattern.is_match(description))
        .map(|k| k.delta)
        .sum();

    if description.chars().count() > SUBSTANTIVE_DESCRIPTION {
        b.description = LENGTH_DELTA;
    }

    let title_len = title.chars().count();
    if title_len > TITLE_BOUNDED_MIN && title_len < TITLE_BOUNDED_MAX {
        b.title_length += LENGTH_DELTA;
    }
    if title_len < TITLE_SHORT {
        b.title_length -= LENGTH_DELTA;
    }
    if title_len > TITLE_LONG {
        b.title_length -= LENGTH_DELTA;
    }

    b
}

/// Score an article. Pure: the same inputs always give the same integer.
pub fn score(
    rules: &QualityRules,
    title: &str,
    description: &str,
    source: &str,
    priority: u32,
) -> i64 {
    breakdown(rules, title, description, source, priority).total()
}
