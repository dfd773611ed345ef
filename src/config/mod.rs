//! Configuration management for the rating engine
//!
//! This module handles configuration loading from defaults, environment
//! variables, and TOML files, plus validation of rating parameters.

pub mod engine;

// Re-export commonly used types
pub use engine::{EngineConfig, UNMAPPED_ROUND_PRIORITY};
