//! Round grouper: turns raw result rows into ordered competition rounds
//!
//! Rows are validated, sorted into the strict chronological processing order,
//! and partitioned into one group per (event, date, discipline, gender, round)
//! tuple. The order produced here is the ledger's canonical append order, so
//! every step uses stable sorts.

use crate::config::EngineConfig;
use crate::error::{RatingError, Result};
use crate::types::{normalize_name, CompetitionRound, ResultRow, RoundDescriptor, RoundEntry};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A validated row with its sort metadata
struct CleanRow {
    descriptor: RoundDescriptor,
    entry: RoundEntry,
    round_order: u32,
}

/// Check one raw row, normalizing the athlete name on success
fn validate_row(row: &ResultRow, config: &EngineConfig) -> std::result::Result<CleanRow, RatingError> {
    let name = normalize_name(&row.name);
    if name.is_empty() {
        return Err(RatingError::RowValidation {
            reason: format!("missing athlete name (event {:?})", row.event_name),
        });
    }

    let rank = row.rank.ok_or_else(|| RatingError::RowValidation {
        reason: format!("missing rank for {:?} in {:?}", name, row.event_name),
    })?;

    let date = row.date.ok_or_else(|| RatingError::RowValidation {
        reason: format!("missing date for {:?} in {:?}", name, row.event_name),
    })?;

    Ok(CleanRow {
        round_order: config.round_priority(&row.round),
        descriptor: RoundDescriptor {
            event: row.event_name.clone(),
            date,
            discipline: row.discipline.clone(),
            gender: row.gender.clone(),
            round: row.round.clone(),
        },
        entry: RoundEntry {
            athlete: name,
            country: row.country.clone(),
            rank,
        },
    })
}

/// Partition raw rows into competition rounds in strict processing order.
///
/// Invalid rows (missing name, rank, or date) are dropped and counted; the
/// call fails with [`RatingError::EmptySource`] only if nothing survives.
/// Rounds with fewer than two entrants are dropped because they carry no
/// pairwise information.
pub fn group_rounds(rows: &[ResultRow], config: &EngineConfig) -> Result<Vec<CompetitionRound>> {
    let mut clean: Vec<CleanRow> = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        match validate_row(row, config) {
            Ok(valid) => clean.push(valid),
            Err(e) => {
                debug!("Dropping row: {}", e);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} invalid result rows during validation", dropped);
    }
    if clean.is_empty() {
        return Err(RatingError::EmptySource.into());
    }

    // Canonical processing order: date, event, round priority, rank.
    // Stable, so rows with identical keys keep their input order.
    clean.sort_by(|a, b| {
        (a.descriptor.date, &a.descriptor.event, a.round_order, a.entry.rank).cmp(&(
            b.descriptor.date,
            &b.descriptor.event,
            b.round_order,
            b.entry.rank,
        ))
    });

    // Group by exact descriptor, preserving first-occurrence order. Rows of
    // one round need not be adjacent after the sort (two gender categories
    // of the same final interleave by rank), so grouping goes through an
    // index map rather than an adjacency scan.
    let mut rounds: Vec<CompetitionRound> = Vec::new();
    let mut index: HashMap<RoundDescriptor, usize> = HashMap::new();

    for row in clean {
        match index.get(&row.descriptor) {
            Some(&i) => rounds[i].entries.push(row.entry),
            None => {
                index.insert(row.descriptor.clone(), rounds.len());
                rounds.push(CompetitionRound {
                    descriptor: row.descriptor,
                    entries: vec![row.entry],
                });
            }
        }
    }

    for round in &mut rounds {
        round.entries.sort_by_key(|entry| entry.rank);
    }

    let before = rounds.len();
    rounds.retain(|round| round.field_size() >= 2);
    if rounds.len() < before {
        debug!(
            "Skipped {} rounds with fewer than two entrants",
            before - rounds.len()
        );
    }

    Ok(rounds)
}
