//! Clickbait and low-quality detection.
//!
//! `is_clickbait` only looks at the title. The description parameter is part
//! of the signature so both predicates share one shape, but headline hooks are
//! judged on the headline alone: feed descriptions routinely quote the hook
//! phrases they are reporting on.

use super::rules::QualityRules;

/// Uppercase share above which a title counts as shouting (30%).
const CAPS_RATIO_NUM: usize = 3;
const CAPS_RATIO_DEN: usize = 10;

/// Titles with this many letters or fewer are exempt from the caps check.
const CAPS_MIN_LETTERS: usize = 10;

/// Returns `true` if the title looks like clickbait.
///
/// Checks, in order: every clickbait pattern, excessive capitals (more than
/// 30% of ASCII letters, titles longer than 10 letters only), and more than
/// one `!` or more than one `?`.
pub fn is_clickbait(rules: &QualityRules, title: &str, _description: &str) -> bool {
    if rules.clickbait.iter().any(|p| p.is_match(title)) {
        return true;
    }

    let letters = title.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let caps = title.chars().filter(|c| c.is_ascii_uppercase()).count();
    if letters > CAPS_MIN_LETTERS && caps * CAPS_RATIO_DEN > letters * CAPS_RATIO_NUM {
        return true;
    }

    title.matches('!').count() > 1 || title.matches('?').count() > 1
}

/// Returns `true` if title or description mentions a gossip topic.
pub fn is_low_quality(rules: &QualityRules, title: &str, description: &str) -> bool {
    let text = format!("{} {}", title, description).to_ascii_lowercase();
    rules.low_quality.iter().any(|p| p.is_match(&text))
}
