//! Rating engine orchestration: full recompute and incremental merge
//!
//! The engine runs the sequential pipeline (group, initialize newcomers,
//! pairwise update, ledger append) over a batch of raw rows. Both entry
//! points are all-or-nothing: they build a fresh ledger value and only hand
//! it back on success, so a failure leaves the caller's state untouched.

use crate::config::EngineConfig;
use crate::error::{RatingError, Result};
use crate::grouper::group_rounds;
use crate::ledger::Ledger;
use crate::rating::{PairwiseElo, RatingKey, RatingStore};
use crate::types::{AthleteId, CompetitionRound, RatingRecord, ResultRow};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

/// The chronological rating engine
#[derive(Debug, Clone)]
pub struct RatingEngine {
    config: EngineConfig,
    elo: PairwiseElo,
}

impl RatingEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let elo = PairwiseElo::new(config.k_factor)?;
        Ok(Self { config, elo })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Full recomputation: build a complete ledger from a result corpus.
    pub fn compute(&self, rows: &[ResultRow]) -> Result<Ledger> {
        let rounds = group_rounds(rows, &self.config)?;

        let mut store = RatingStore::new();
        let mut ledger = Ledger::new();
        self.process_rounds(&rounds, &mut store, &mut ledger);

        info!(
            "Computed ratings for {} athletes over {} rounds ({} ledger records)",
            store.len(),
            rounds.len(),
            ledger.len()
        );
        Ok(ledger)
    }

    /// Incremental merge: extend an existing ledger with a new result batch.
    ///
    /// The rating store is seeded by replaying the existing ledger; only the
    /// new batch's rounds are processed, and initialization records are
    /// emitted only for athletes absent from the reconstructed state.
    ///
    /// Batches must be current-or-future relative to the ledger frontier. A
    /// batch reaching behind the frontier is still processed, in its own
    /// chronological order against end-of-ledger ratings, which diverges
    /// from a full recompute; that condition is logged as an advisory
    /// warning rather than failing the merge.
    pub fn extend(&self, existing: &Ledger, rows: &[ResultRow]) -> Result<Ledger> {
        let rounds = group_rounds(rows, &self.config)?;

        let mut store = RatingStore::new();
        store.seed(existing.replay(self.config.scope));

        if let (Some(frontier), Some(batch_start)) =
            (existing.frontier(), rounds.first().map(|r| r.descriptor.date))
        {
            if batch_start < frontier {
                let advisory = RatingError::OrderingViolation {
                    batch_start,
                    frontier,
                };
                warn!("{advisory}; ratings will not match a full recompute");
            }
        }

        let mut ledger = existing.clone();
        let previous_len = ledger.len();
        self.process_rounds(&rounds, &mut store, &mut ledger);

        info!(
            "Merged {} rounds into ledger: {} new records, {} rated athletes",
            rounds.len(),
            ledger.len() - previous_len,
            store.len()
        );
        Ok(ledger)
    }

    /// Run the sequential update over grouped rounds.
    ///
    /// Rounds arrive in canonical chronological order; each round reads the
    /// store as left by the previous one, which is why there is no parallel
    /// decomposition here.
    fn process_rounds(
        &self,
        rounds: &[CompetitionRound],
        store: &mut RatingStore,
        ledger: &mut Ledger,
    ) {
        let (first_seen, first_country) = self.first_appearances(rounds);

        for round in rounds {
            let descriptor = &round.descriptor;

            // Newcomers enter the store before their first round, with the
            // initialization record dated at their first appearance in the
            // batch (not necessarily this round's date).
            for entry in &round.entries {
                let key = RatingKey::new(self.config.scope, &entry.athlete, &descriptor.discipline);
                if !store.contains(&key) {
                    let first_date = first_seen.get(&key).copied().unwrap_or(descriptor.date);
                    store.get_or_init(key, self.config.initial_rating);
                    ledger.push(RatingRecord::initialization(
                        entry.athlete.clone(),
                        first_country.get(&entry.athlete).cloned().flatten(),
                        first_date,
                        &descriptor.discipline,
                        &descriptor.gender,
                        self.config.initial_rating,
                    ));
                }
            }

            // All deltas are computed from pre-round ratings, then applied
            // together; a mid-round store write would make the outcome
            // depend on iteration order.
            let field: Vec<(f64, u32)> = round
                .entries
                .iter()
                .map(|entry| {
                    let key =
                        RatingKey::new(self.config.scope, &entry.athlete, &descriptor.discipline);
                    let rating = store.get(&key).unwrap_or(self.config.initial_rating);
                    (rating, entry.rank)
                })
                .collect();

            let deltas = self.elo.round_deltas(&field);

            let mut applied = Vec::with_capacity(deltas.len());
            for ((entry, &(elo_before, _)), &delta) in
                round.entries.iter().zip(field.iter()).zip(deltas.iter())
            {
                let key = RatingKey::new(self.config.scope, &entry.athlete, &descriptor.discipline);
                ledger.push(RatingRecord::competition(
                    descriptor,
                    entry,
                    first_country.get(&entry.athlete).cloned().flatten(),
                    elo_before,
                    delta,
                ));
                applied.push((key, delta));
            }
            store.apply_round(&applied);
        }
    }

    /// First chronological appearance per rating key and first-observed
    /// country per athlete, across the whole batch.
    fn first_appearances(
        &self,
        rounds: &[CompetitionRound],
    ) -> (
        HashMap<RatingKey, NaiveDate>,
        HashMap<AthleteId, Option<String>>,
    ) {
        let mut first_seen: HashMap<RatingKey, NaiveDate> = HashMap::new();
        let mut first_country: HashMap<AthleteId, Option<String>> = HashMap::new();

        // Rounds are already chronological, so the first insert wins.
        for round in rounds {
            for entry in &round.entries {
                let key = RatingKey::new(
                    self.config.scope,
                    &entry.athlete,
                    &round.descriptor.discipline,
                );
                first_seen.entry(key).or_insert(round.descriptor.date);

                let country = first_country.entry(entry.athlete.clone()).or_insert(None);
                if country.is_none() {
                    *country = entry.country.clone();
                }
            }
        }

        (first_seen, first_country)
    }
}
