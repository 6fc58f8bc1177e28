//! RSS 2.0 rendering of the digest.
//!
//! Every text node and attribute value goes through [`escape_xml`], so the
//! output never contains a raw `&`, `<`, `>`, `"` or `'` from article data.

use crate::config::ChannelSettings;
use crate::models::{Article, RankedDigest, Topic};
use crate::utils::{
    collapse_whitespace, escape_xml, format_rfc2822, rfc2822_or, strip_markup, truncate_chars, web_link,
};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::fmt::{self, Write};

/// Maximum description length, in characters, after markup is removed.
pub const DESCRIPTION_LIMIT: usize = 500;

/// Plain-text description: markup removed, whitespace collapsed, truncated.
pub fn clean_description(description: &str) -> String {
    let text = collapse_whitespace(&strip_markup(description));
    truncate_chars(&text, DESCRIPTION_LIMIT).to_string()
}

/// Channel description followed by the topics the registry covers.
pub fn channel_description(channel: &ChannelSettings, topics: &[Topic]) -> String {
    if topics.is_empty() {
        channel.description.clone()
    } else {
        format!(
            "{} Topics: {}.",
            channel.description,
            topics.iter().map(Topic::label).join(", ")
        )
    }
}

fn write_item(out: &mut String, article: &Article, built_at: &DateTime<Utc>) -> fmt::Result {
    writeln!(out, "    <item>")?;
    writeln!(out, "      <title>{}</title>", escape_xml(&article.title))?;
    if let Some(link) = web_link(&article.link) {
        writeln!(out, "      <link>{}</link>", escape_xml(link))?;
    }
    writeln!(
        out,
        "      <description>{}</description>",
        escape_xml(&clean_description(&article.description))
    )?;
    writeln!(out, "      <pubDate>{}</pubDate>", rfc2822_or(&article.pub_date, built_at))?;
    writeln!(out, "      <category>{}</category>", escape_xml(article.topic.as_str()))?;
    writeln!(out, "      <source>{}</source>", escape_xml(&article.source))?;
    writeln!(out, "    </item>")
}

/// Render the whole feed document.
///
/// `built_at` becomes `lastBuildDate` and the `pubDate` of any article whose
/// stored date cannot be parsed.
pub fn render_feed(
    digest: &RankedDigest,
    channel: &ChannelSettings,
    topics: &[Topic],
    built_at: &DateTime<Utc>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#)?;
    writeln!(out, "  <channel>")?;
    writeln!(out, "    <title>{}</title>", escape_xml(&channel.title))?;
    writeln!(out, "    <link>{}</link>", escape_xml(&channel.link))?;
    writeln!(
        out,
        "    <description>{}</description>",
        escape_xml(&channel_description(channel, topics))
    )?;
    writeln!(out, "    <language>{}</language>", escape_xml(&channel.language))?;
    writeln!(out, "    <lastBuildDate>{}</lastBuildDate>", format_rfc2822(built_at))?;
    writeln!(
        out,
        r#"    <atom:link href="{}" rel="self" type="application/rss+xml"/>"#,
        escape_xml(&channel.feed_url)
    )?;
    for article in digest {
        write_item(&mut out, article, built_at)?;
    }
    writeln!(out, "  </channel>")?;
    writeln!(out, "</rss>")?;
    Ok(out)
}
