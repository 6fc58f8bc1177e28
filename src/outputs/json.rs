//! JSON dump of the digest for API consumption.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── digest.json   # { "generatedAt": "...", "count": N, "articles": [...] }
//! ```

use crate::models::RankedDigest;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub const FILE_NAME: &str = "digest.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DigestDocument<'a> {
    generated_at: String,
    count: usize,
    articles: &'a RankedDigest,
}

/// Serialize the digest with its generation timestamp.
pub fn render_json(digest: &RankedDigest, generated_at: &DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DigestDocument {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        count: digest.len(),
        articles: digest,
    })
}

/// Write the digest as JSON to `{output_dir}/digest.json`.
///
/// # Arguments
///
/// * `digest` - The ranked articles to serialize
/// * `generated_at` - Timestamp recorded as `generatedAt`
/// * `output_dir` - Existing directory receiving the file
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization or the file write fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_digest(
    digest: &RankedDigest,
    generated_at: &DateTime<Utc>,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let json = render_json(digest, generated_at)?;
    let path = output_dir.join(FILE_NAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = digest.len(), "Wrote JSON digest");
    Ok(())
}
