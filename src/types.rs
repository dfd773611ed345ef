//! Common types used throughout the rating engine

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier for athletes: the normalized display name
pub type AthleteId = String;

/// Normalize a raw athlete name into its canonical identity form.
///
/// Leading/trailing whitespace is trimmed, interior runs of whitespace
/// collapse to a single space, and each alphabetic run is title-cased
/// ("janja  GARNBRET" -> "Janja Garnbret"). Identity is this normalized
/// string; lookups elsewhere compare case-insensitively on top of it.
pub fn normalize_name(raw: &str) -> AthleteId {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alphabetic = false;
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
            prev_alphabetic = false;
        }
        for ch in word.chars() {
            if ch.is_alphabetic() {
                if prev_alphabetic {
                    out.extend(ch.to_lowercase());
                } else {
                    out.extend(ch.to_uppercase());
                }
                prev_alphabetic = true;
            } else {
                out.push(ch);
                prev_alphabetic = false;
            }
        }
    }
    out
}

/// How rating state is keyed across disciplines.
///
/// The source data keeps one scalar per athlete shared across every
/// discipline and gender category they compete in, so a Boulder round
/// moves the rating used in Lead comparisons. That behavior is preserved
/// as the default; `PerDiscipline` partitions the key instead. Switching
/// scope changes every computed rating and is a visible caller choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingScope {
    #[default]
    Global,
    PerDiscipline,
}

impl std::fmt::Display for RatingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingScope::Global => write!(f, "global"),
            RatingScope::PerDiscipline => write!(f, "per-discipline"),
        }
    }
}

/// A raw competition result row as delivered by the data collaborators.
///
/// Rank and date are optional here because upstream sources emit rows with
/// missing values; the grouper rejects such rows during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "round_rank")]
    pub rank: Option<u32>,
    pub event_name: String,
    #[serde(default, alias = "start_date")]
    pub date: Option<NaiveDate>,
    pub discipline: String,
    pub gender: String,
    pub round: String,
}

/// The identity of one competition round
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundDescriptor {
    pub event: String,
    pub date: NaiveDate,
    pub discipline: String,
    pub gender: String,
    pub round: String,
}

/// A single ranked entrant within a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEntry {
    pub athlete: AthleteId,
    pub country: Option<String>,
    pub rank: u32,
}

/// One scored competition stage with its ranked field.
///
/// Entries are ordered by ascending rank; ties carry equal rank values.
#[derive(Debug, Clone)]
pub struct CompetitionRound {
    pub descriptor: RoundDescriptor,
    pub entries: Vec<RoundEntry>,
}

impl CompetitionRound {
    /// Number of ranked entrants
    pub fn field_size(&self) -> usize {
        self.entries.len()
    }
}

/// Event name used for synthetic initialization records
pub const INITIAL_EVENT: &str = "Initial Rating";

/// Round name used for synthetic initialization records
pub const INITIAL_ROUND: &str = "Initial";

/// One immutable ledger entry: either a competition result with its rating
/// change, or a synthetic initialization entry (`competed == false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub name: AthleteId,
    pub country: Option<String>,
    pub event: String,
    pub year: i32,
    pub date: NaiveDate,
    pub discipline: String,
    pub gender: String,
    pub round: String,
    pub rank: Option<u32>,
    pub elo_before: f64,
    pub elo_after: f64,
    pub elo_change: f64,
    pub competed: bool,
}

impl RatingRecord {
    /// Build the zero-delta record marking an athlete's first appearance.
    ///
    /// Discipline and gender are taken from the round that triggered the
    /// athlete's creation; the date is their first chronological appearance
    /// within the batch.
    pub fn initialization(
        name: AthleteId,
        country: Option<String>,
        first_date: NaiveDate,
        discipline: &str,
        gender: &str,
        initial_rating: f64,
    ) -> Self {
        Self {
            name,
            country,
            event: INITIAL_EVENT.to_string(),
            year: first_date.year(),
            date: first_date,
            discipline: discipline.to_string(),
            gender: gender.to_string(),
            round: INITIAL_ROUND.to_string(),
            rank: None,
            elo_before: initial_rating,
            elo_after: initial_rating,
            elo_change: 0.0,
            competed: false,
        }
    }

    /// Build a competition record from a round entry and its rating change.
    ///
    /// `country` is the athlete's first-observed country, which every record
    /// carries regardless of what the individual row reported.
    pub fn competition(
        descriptor: &RoundDescriptor,
        entry: &RoundEntry,
        country: Option<String>,
        elo_before: f64,
        elo_change: f64,
    ) -> Self {
        Self {
            name: entry.athlete.clone(),
            country,
            event: descriptor.event.clone(),
            year: descriptor.date.year(),
            date: descriptor.date,
            discipline: descriptor.discipline.clone(),
            gender: descriptor.gender.clone(),
            round: descriptor.round.clone(),
            rank: Some(entry.rank),
            elo_before,
            elo_after: elo_before + elo_change,
            elo_change,
            competed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  janja garnbret "), "Janja Garnbret");
        assert_eq!(normalize_name("ADAM ONDRA"), "Adam Ondra");
        assert_eq!(normalize_name("sean mccoll"), "Sean Mccoll");
        assert_eq!(normalize_name("anne-sophie koller"), "Anne-Sophie Koller");
        assert_eq!(normalize_name("a  b"), "A B");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_rating_scope_default_is_global() {
        assert_eq!(RatingScope::default(), RatingScope::Global);
        assert_eq!(RatingScope::PerDiscipline.to_string(), "per-discipline");
    }

    #[test]
    fn test_result_row_accepts_source_column_aliases() {
        let row: ResultRow = serde_json::from_str(
            r#"{
                "name": "Adam Ondra",
                "round_rank": 1,
                "event_name": "IFSC World Cup Innsbruck",
                "start_date": "2023-06-14",
                "discipline": "Lead",
                "gender": "Men",
                "round": "Final"
            }"#,
        )
        .unwrap();

        assert_eq!(row.rank, Some(1));
        assert_eq!(row.date, Some(NaiveDate::from_ymd_opt(2023, 6, 14).unwrap()));
        assert!(row.country.is_none());
    }

    #[test]
    fn test_initialization_record_shape() {
        let date = NaiveDate::from_ymd_opt(2019, 4, 5).unwrap();
        let record = RatingRecord::initialization(
            "Janja Garnbret".to_string(),
            Some("SLO".to_string()),
            date,
            "Boulder",
            "Women",
            1500.0,
        );

        assert_eq!(record.event, INITIAL_EVENT);
        assert_eq!(record.round, INITIAL_ROUND);
        assert_eq!(record.year, 2019);
        assert_eq!(record.rank, None);
        assert_eq!(record.elo_before, record.elo_after);
        assert_eq!(record.elo_change, 0.0);
        assert!(!record.competed);
    }
}
