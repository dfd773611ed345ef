//! Rating store: the current rating scalar per rating key
//!
//! The only mutable shared state in the engine. Access is strictly
//! sequential and single-owner (one computation at a time), so this is a
//! plain map with no interior locking.

use crate::types::{AthleteId, RatingScope};
use std::collections::HashMap;

/// Key under which a rating scalar is stored.
///
/// Under [`RatingScope::Global`] the discipline component is `None` and an
/// athlete carries one rating across all disciplines; under
/// [`RatingScope::PerDiscipline`] each (athlete, discipline) pair rates
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatingKey {
    pub athlete: AthleteId,
    pub discipline: Option<String>,
}

impl RatingKey {
    /// Build the key for an athlete competing in `discipline` under `scope`
    pub fn new(scope: RatingScope, athlete: &str, discipline: &str) -> Self {
        Self {
            athlete: athlete.to_string(),
            discipline: match scope {
                RatingScope::Global => None,
                RatingScope::PerDiscipline => Some(discipline.to_string()),
            },
        }
    }
}

/// Current rating snapshot, keyed by [`RatingKey`]
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: HashMap<RatingKey, f64>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rating for a key, if it has been initialized
    pub fn get(&self, key: &RatingKey) -> Option<f64> {
        self.ratings.get(key).copied()
    }

    pub fn contains(&self, key: &RatingKey) -> bool {
        self.ratings.contains_key(key)
    }

    /// Current rating for a key, inserting `initial` on first sight
    pub fn get_or_init(&mut self, key: RatingKey, initial: f64) -> f64 {
        *self.ratings.entry(key).or_insert(initial)
    }

    /// Apply one round's deltas together.
    ///
    /// All keys must already be initialized; the grouper and engine
    /// guarantee initialization happens before a round is processed.
    pub fn apply_round(&mut self, deltas: &[(RatingKey, f64)]) {
        for (key, delta) in deltas {
            debug_assert!(self.ratings.contains_key(key));
            if let Some(rating) = self.ratings.get_mut(key) {
                *rating += delta;
            }
        }
    }

    /// Replace the store contents with a reconstructed snapshot
    pub fn seed(&mut self, snapshot: HashMap<RatingKey, f64>) {
        self.ratings = snapshot;
    }

    /// Number of rated keys
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
