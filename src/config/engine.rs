//! Rating engine configuration
//!
//! Defines the engine parameters (K factor, initial rating, round priority
//! table, rating scope) with environment variable loading and validation.

use crate::error::RatingError;
use crate::types::RatingScope;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Sort priority assigned to round names absent from the priority table
pub const UNMAPPED_ROUND_PRIORITY: u32 = 99;

/// Rating engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// K factor: maximum rating swing per round
    pub k_factor: f64,
    /// Rating assigned to athletes at first appearance
    pub initial_rating: f64,
    /// Round name -> chronological priority within one event day.
    /// Unmapped names sort last via [`UNMAPPED_ROUND_PRIORITY`].
    pub round_priority: HashMap<String, u32>,
    /// Rating key scope (global per athlete, or partitioned by discipline)
    pub scope: RatingScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let round_priority = HashMap::from([
            ("Qualification".to_string(), 0),
            ("Semi-Final".to_string(), 1),
            ("Final".to_string(), 2),
        ]);

        Self {
            k_factor: 32.0,
            initial_rating: 1500.0,
            round_priority,
            scope: RatingScope::Global,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(k) = env::var("CRUX_K_FACTOR") {
            config.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid CRUX_K_FACTOR value: {}", k))?;
        }
        if let Ok(rating) = env::var("CRUX_INITIAL_RATING") {
            config.initial_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid CRUX_INITIAL_RATING value: {}", rating))?;
        }
        if let Ok(scope) = env::var("CRUX_RATING_SCOPE") {
            config.scope = match scope.to_lowercase().as_str() {
                "global" => RatingScope::Global,
                "per-discipline" => RatingScope::PerDiscipline,
                _ => return Err(anyhow!("Invalid CRUX_RATING_SCOPE value: {}", scope)),
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Sort priority for a round name
    pub fn round_priority(&self, round: &str) -> u32 {
        self.round_priority
            .get(round)
            .copied()
            .unwrap_or(UNMAPPED_ROUND_PRIORITY)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::Configuration {
                message: format!("K factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RatingError::Configuration {
                message: format!("Initial rating must be finite, got {}", self.initial_rating),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.k_factor, 32.0);
        assert_eq!(config.initial_rating, 1500.0);
        assert_eq!(config.scope, RatingScope::Global);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_priority_table() {
        let config = EngineConfig::default();
        assert_eq!(config.round_priority("Qualification"), 0);
        assert_eq!(config.round_priority("Semi-Final"), 1);
        assert_eq!(config.round_priority("Final"), 2);
        assert_eq!(config.round_priority("Super-Final"), UNMAPPED_ROUND_PRIORITY);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.k_factor = 0.0;
        assert!(config.validate().is_err());

        config.k_factor = -5.0;
        assert!(config.validate().is_err());

        config.k_factor = 32.0;
        config.initial_rating = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.k_factor, config.k_factor);
        assert_eq!(parsed.initial_rating, config.initial_rating);
        assert_eq!(parsed.round_priority("Final"), 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: EngineConfig = toml::from_str("k_factor = 24.0").unwrap();
        assert_eq!(parsed.k_factor, 24.0);
        assert_eq!(parsed.initial_rating, 1500.0);
        assert_eq!(parsed.scope, RatingScope::Global);
    }
}
