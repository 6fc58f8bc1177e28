//! Static HTML page listing the digest.

use crate::config::ChannelSettings;
use crate::models::{Article, RankedDigest, Topic};
use crate::utils::{collapse_whitespace, escape_xml, parse_pub_date, strip_markup, truncate_chars, web_link};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::fmt::{self, Write};

/// Maximum preview length, in characters.
pub const PREVIEW_LIMIT: usize = 300;

const STYLE: &str = r#"    body { font-family: -apple-system, BlinkMacSystemFont, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; background: #f5f5f5; }
    h1 { color: #333; border-bottom: 3px solid #0066cc; padding-bottom: 10px; }
    article { background: white; padding: 20px; margin: 15px 0; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    h2 { margin-top: 0; font-size: 1.2em; }
    h2 a { color: #0066cc; text-decoration: none; }
    h2 a:hover { text-decoration: underline; }
    .meta { color: #666; font-size: 0.85em; margin: 10px 0; }
    .meta span { margin-right: 15px; }
    .topic { background: #0066cc; color: white; padding: 2px 8px; border-radius: 12px; }
    .source { font-weight: bold; }
    p { color: #444; line-height: 1.6; }
    .subscribe { background: #e8f4e8; padding: 15px; border-radius: 8px; margin: 20px 0; }
    .subscribe a { color: #0066cc; }
    .footer { text-align: center; color: #666; margin-top: 40px; font-size: 0.9em; }
"#;

/// Description preview: markup removed, then cut to [`PREVIEW_LIMIT`] characters.
pub fn preview(description: &str) -> String {
    let text = collapse_whitespace(&strip_markup(description));
    truncate_chars(&text, PREVIEW_LIMIT).to_string()
}

/// Short display date, or `fallback`'s date when the stored one cannot be parsed.
fn display_date(pub_date: &str, fallback: &DateTime<Utc>) -> String {
    parse_pub_date(pub_date)
        .unwrap_or(*fallback)
        .format("%b %-d, %Y")
        .to_string()
}

fn write_article(out: &mut String, article: &Article, built_at: &DateTime<Utc>) -> fmt::Result {
    writeln!(out, "  <article>")?;
    match web_link(&article.link) {
        Some(href) => writeln!(
            out,
            r#"    <h2><a href="{}" target="_blank" rel="noopener">{}</a></h2>"#,
            escape_xml(href),
            escape_xml(&article.title)
        )?,
        None => writeln!(out, "    <h2>{}</h2>", escape_xml(&article.title))?,
    }
    writeln!(out, r#"    <div class="meta">"#)?;
    writeln!(out, r#"      <span class="topic">{}</span>"#, escape_xml(article.topic.as_str()))?;
    writeln!(out, r#"      <span class="source">{}</span>"#, escape_xml(&article.source))?;
    writeln!(
        out,
        r#"      <span class="date">{}</span>"#,
        display_date(&article.pub_date, built_at)
    )?;
    writeln!(out, "    </div>")?;
    writeln!(out, "    <p>{}...</p>", escape_xml(&preview(&article.description)))?;
    writeln!(out, "  </article>")
}

/// Render the full page: header, subscribe block, one `<article>` per entry, footer.
pub fn render_page(
    digest: &RankedDigest,
    channel: &ChannelSettings,
    topics: &[Topic],
    built_at: &DateTime<Utc>,
) -> Result<String, fmt::Error> {
    let feed_url = escape_xml(&channel.feed_url);
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="{}">"#, escape_xml(&channel.language))?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"  <meta charset="UTF-8">"#)?;
    writeln!(out, r#"  <meta name="viewport" content="width=device-width, initial-scale=1.0">"#)?;
    writeln!(out, "  <title>{}</title>", escape_xml(&channel.title))?;
    writeln!(
        out,
        r#"  <link rel="alternate" type="application/rss+xml" title="{}" href="{}">"#,
        escape_xml(&channel.title),
        feed_url
    )?;
    write!(out, "  <style>\n{STYLE}  </style>\n")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "  <h1>📰 {}</h1>", escape_xml(&channel.title))?;
    writeln!(out, "  <p>{}</p>", escape_xml(&channel.description))?;
    writeln!(out, r#"  <div class="subscribe">"#)?;
    writeln!(
        out,
        r#"    <strong>Subscribe in Feedly:</strong> <a href="https://feedly.com/i/subscription/feed/{feed_url}">Add to Feedly</a>"#
    )?;
    writeln!(out, "    <br>")?;
    writeln!(out, "    <strong>RSS Feed URL:</strong> <code>{feed_url}</code>")?;
    writeln!(out, "  </div>")?;

    for article in digest {
        write_article(&mut out, article, built_at)?;
    }

    writeln!(out, r#"  <div class="footer">"#)?;
    writeln!(
        out,
        "    <p>Last updated: {}</p>",
        built_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(
        out,
        "    <p>Topics: {}</p>",
        escape_xml(&topics.iter().map(Topic::label).join(", "))
    )?;
    writeln!(out, "  </div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::ingest;
    use crate::models::FeedSource;
    use crate::quality::QualityRules;
    use crate::rank::rank;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 6, 7, 30, 0).unwrap()
    }

    fn article(title: &str, description: &str, pub_date: &str) -> Article {
        Article {
            title: title.to_string(),
            link: "https://example.com/story?id=1&ref=rss".to_string(),
            description: description.to_string(),
            pub_date: pub_date.to_string(),
            source: "Ars Technica".to_string(),
            topic: Topic::Technology,
            score: 20,
        }
    }

    fn render(articles: Vec<Article>) -> String {
        let digest = rank(articles, 30);
        render_page(
            &digest,
            &ChannelSettings::default(),
            &[Topic::Technology, Topic::Software],
            &built_at(),
        )
        .unwrap()
    }

    #[test]
    fn test_preview_truncates_to_limit() {
        let long = "x".repeat(1000);
        assert_eq!(preview(&long).chars().count(), PREVIEW_LIMIT);
        assert_eq!(preview("<em>short</em> text"), "short text");
    }

    #[test]
    fn test_page_article_block() {
        let html = render(vec![article(
            "Chips <faster> & cheaper",
            "Vendors say \"soon\"",
            "Mon, 05 May 2025 09:00:00 GMT",
        )]);

        assert!(html.contains(
            r#"<a href="https://example.com/story?id=1&amp;ref=rss" target="_blank" rel="noopener">Chips &lt;faster&gt; &amp; cheaper</a>"#
        ));
        assert!(html.contains(r#"<span class="topic">technology</span>"#));
        assert!(html.contains(r#"<span class="source">Ars Technica</span>"#));
        assert!(html.contains(r#"<span class="date">May 5, 2025</span>"#));
        assert!(html.contains("<p>Vendors say &quot;soon&quot;...</p>"));
    }

    #[test]
    fn test_page_chrome() {
        let html = render(Vec::new());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="subscribe">"#));
        assert!(html.contains("https://feedly.com/i/subscription/feed/https://example.github.io/morning-digest/feed.xml"));
        assert!(html.contains("Last updated: 2025-05-06 07:30 UTC"));
        assert!(html.contains("Topics: Technology, Software Development"));
        assert!(!html.contains("<article>"));
    }

    #[test]
    fn test_script_link_from_feed_is_not_a_target() {
        let body = r#"<rss><channel><item>
            <title>Researchers publish open source compiler results today</title>
            <link>javascript:alert(document.cookie)</link>
        </item></channel></rss>"#;
        let source = FeedSource::new("https://example.com/rss", Topic::Software, "Hacker News", 7);
        let articles = ingest(body, &source, &QualityRules::default(), built_at()).unwrap();
        let html = render(articles);

        assert!(!html.contains("javascript:"));
        assert!(html.contains("<h2>Researchers publish open source compiler results today</h2>"));
    }

    #[test]
    fn test_unparseable_date_shows_build_date() {
        let html = render(vec![article("A reasonably long title", "", "not a date")]);
        assert!(html.contains(r#"<span class="date">May 6, 2025</span>"#));
    }

    proptest! {
        #[test]
        fn prop_title_and_preview_escaped(title in ".{0,60}", description in ".{0,120}") {
            let html = render(vec![article(&title, &description, "")]);
            let block = html.split("<article>").nth(1).unwrap();

            let anchor_start = block.find(r#"rel="noopener">"#).unwrap() + r#"rel="noopener">"#.len();
            let anchor_end = block.find("</a></h2>").unwrap();
            let shown_title = &block[anchor_start..anchor_end];
            prop_assert!(!shown_title.contains(['<', '>', '"', '\'']));

            let p_start = block.find("<p>").unwrap() + 3;
            let p_end = block.rfind("...</p>").unwrap();
            prop_assert!(!block[p_start..p_end].contains(['<', '>', '"', '\'']));
        }
    }
}
