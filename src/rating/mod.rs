//! Rating state and the pairwise Elo update algorithm
//!
//! This module holds the mutable rating store and the multi-competitor
//! Elo calculation built on the skillratings crate.

pub mod elo;
pub mod store;

// Re-export commonly used types
pub use elo::PairwiseElo;
pub use store::{RatingKey, RatingStore};
