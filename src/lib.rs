//! Crux Rating - chronological Elo rating engine for climbing competitions
//!
//! This crate converts a time-ordered stream of ranked competition results
//! into evolving per-athlete Elo ratings, with full recomputation,
//! incremental ledger extension, and read-only ranking queries.

pub mod config;
pub mod engine;
pub mod error;
pub mod grouper;
pub mod ledger;
pub mod query;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::EngineConfig;
pub use engine::RatingEngine;
pub use ledger::Ledger;
pub use query::{athlete_history, leaderboard, LeaderboardEntry, LeaderboardFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
