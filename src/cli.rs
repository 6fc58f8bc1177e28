//! Command-line interface definitions for Morning Digest.
//!
//! Every flag is optional; running with none builds the digest from the
//! built-in registry into `docs/`.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Morning Digest generator.
///
/// # Examples
///
/// ```sh
/// # Default run: built-in feeds, output to ./docs
/// morning_digest
///
/// # Custom registry and output location, plus a JSON dump
/// morning_digest -c feeds.yaml -o ./public --json
///
/// # Same config file via the environment
/// MORNING_DIGEST_CONFIG=feeds.yaml morning_digest --max-articles 40
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory that receives feed.xml and index.html
    #[arg(short, long, default_value = "docs")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "MORNING_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the maximum number of articles in the digest
    #[arg(long)]
    pub max_articles: Option<usize>,

    /// Override how many feeds are fetched at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Also write digest.json
    #[arg(long)]
    pub json: bool,
}
