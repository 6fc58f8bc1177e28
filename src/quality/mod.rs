//! Heuristic quality model for feed articles.
//!
//! # Submodules
//!
//! - [`rules`]: Ordered pattern tables (clickbait phrases, gossip topics,
//!   reputable sources, topical keyword boosts) compiled once per run
//! - [`classifier`]: Pure predicates `is_clickbait` and `is_low_quality`
//! - [`scoring`]: Sums independent signals into one integer score
//!
//! Everything here is pure: identical inputs always produce identical output,
//! and nothing reads the clock, the network, or process-wide state.

pub mod classifier;
pub mod rules;
pub mod scoring;

pub use rules::QualityRules;
pub use scoring::score;
