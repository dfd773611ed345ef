//! Multi-competitor pairwise Elo update
//!
//! A round of n ranked competitors is scored as all n*(n-1)/2 pairwise Elo
//! games at once. Each competitor's delta is the K-scaled sum of
//! (actual - expected) over their n-1 opponents, normalized by n-1, using the
//! ratings held before the round started. The per-pair terms are antisymmetric,
//! so each round's deltas sum to zero.

use crate::error::{RatingError, Result};
use skillratings::elo::{expected_score, EloConfig, EloRating};

/// Pairwise Elo calculator for ranked multi-competitor rounds
#[derive(Debug, Clone)]
pub struct PairwiseElo {
    config: EloConfig,
}

impl PairwiseElo {
    /// Create a calculator with the given K factor
    pub fn new(k_factor: f64) -> Result<Self> {
        if !k_factor.is_finite() || k_factor <= 0.0 {
            return Err(RatingError::Configuration {
                message: format!("K factor must be positive, got {}", k_factor),
            }
            .into());
        }

        Ok(Self {
            config: EloConfig { k: k_factor },
        })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k
    }

    /// Compute one delta per competitor for a round.
    ///
    /// `field` is the round's (pre-round rating, finishing rank) list in
    /// rank-sorted entry order. Every comparison reads the pre-round ratings
    /// only; opponents are accumulated in field order so the floating-point
    /// result is identical across runs and platforms. Fields with fewer than
    /// two competitors yield all-zero deltas.
    pub fn round_deltas(&self, field: &[(f64, u32)]) -> Vec<f64> {
        let n = field.len();
        if n < 2 {
            return vec![0.0; n];
        }

        let opponents = (n - 1) as f64;
        let mut deltas = Vec::with_capacity(n);

        for (i, &(rating_i, rank_i)) in field.iter().enumerate() {
            let mut total = 0.0;
            for (j, &(rating_j, rank_j)) in field.iter().enumerate() {
                if i == j {
                    continue;
                }

                let (expected, _) =
                    expected_score(&EloRating { rating: rating_i }, &EloRating { rating: rating_j });

                let actual = match rank_i.cmp(&rank_j) {
                    std::cmp::Ordering::Less => 1.0,
                    std::cmp::Ordering::Greater => 0.0,
                    std::cmp::Ordering::Equal => 0.5,
                };

                total += self.config.k * (actual - expected) / opponents;
            }
            deltas.push(total);
        }

        deltas
    }
}
