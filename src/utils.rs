//! Utility functions for text cleanup, date formatting, and file system checks.
//!
//! This module provides helper functions used by the renderers and `main`:
//! - XML/HTML escaping, markup stripping and whitespace collapsing
//! - Character-safe truncation for output and for logging
//! - Publication date parsing and RFC-2822 formatting
//! - File system validation for the output directory

use chrono::{DateTime, Utc};
use itertools::Itertools;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Escape `&`, `<`, `>`, `"` and `'` for use in XML or HTML text and attributes.
pub fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// `link` if it is an absolute `http` or `https` URL.
///
/// Feed links are untrusted; anything else (`javascript:`, `data:`, relative
/// paths, garbage) must not become a clickable target.
pub fn web_link(link: &str) -> Option<&str> {
    let link = link.trim();
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(link),
        _ => None,
    }
}

/// Remove HTML markup, keeping only the text.
///
/// Each tag boundary becomes a single space, so adjacent blocks such as
/// `<p>a</p><p>b</p>` do not run together. Pair with [`collapse_whitespace`].
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().join(" ")
}

/// Replace every run of whitespace with one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// The first `max` characters of `s`.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped characters appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", truncate_chars(s, max), total - max)
    }
}

/// Parse a feed date, trying RFC-2822 first and RFC-3339 second.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format an instant the way RSS readers expect, e.g. `Tue, 06 May 2025 07:30:00 GMT`.
pub fn format_rfc2822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Normalize a stored `pubDate` to RFC-2822, using `fallback` when it cannot be parsed.
pub fn rfc2822_or(raw: &str, fallback: &DateTime<Utc>) -> String {
    format_rfc2822(&parse_pub_date(raw).unwrap_or(*fallback))
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
