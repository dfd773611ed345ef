//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

use chrono::NaiveDate;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// A raw result row lacks rank, name, or date. Recovered locally:
    /// the row is dropped and the computation continues.
    #[error("Invalid result row: {reason}")]
    RowValidation { reason: String },

    /// No usable rows remain after validation; fatal for the call.
    #[error("No usable result rows after validation")]
    EmptySource,

    /// An operation required an existing ledger that was not found.
    /// Callers should fall back to a full computation.
    #[error("Rating ledger not found: {path}")]
    StateNotFound { path: String },

    /// A new batch contains rounds dated before the existing ledger's
    /// frontier. Advisory: logged as a warning, processing proceeds
    /// under the documented merge limitation.
    #[error("Batch starts at {batch_start}, before ledger frontier {frontier}")]
    OrderingViolation {
        batch_start: NaiveDate,
        frontier: NaiveDate,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
