//! Read-only ranking projections over a completed ledger
//!
//! Pure functions: nothing here touches the rating store or mutates the
//! ledger. Filters compare case-insensitively because discipline and gender
//! strings arrive from loosely normalized sources.

use crate::ledger::Ledger;
use crate::types::{AthleteId, RatingRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Optional filters for the current leaderboard
#[derive(Debug, Clone, Default)]
pub struct LeaderboardFilter {
    pub discipline: Option<String>,
    pub gender: Option<String>,
}

impl LeaderboardFilter {
    fn matches(&self, record: &RatingRecord) -> bool {
        // Full Unicode case folding: the corpus carries accented names and
        // loosely cased category strings
        let discipline_ok = self
            .discipline
            .as_ref()
            .map_or(true, |d| record.discipline.to_lowercase() == d.to_lowercase());
        let gender_ok = self
            .gender
            .as_ref()
            .map_or(true, |g| record.gender.to_lowercase() == g.to_lowercase());
        discipline_ok && gender_ok
    }
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub name: AthleteId,
    pub country: Option<String>,
    pub rating: f64,
}

/// Current leaderboard: latest competed rating per athlete under the filter,
/// descending by rating, ties broken by athlete name ascending, truncated to
/// `top_n`.
pub fn leaderboard(ledger: &Ledger, filter: &LeaderboardFilter, top_n: usize) -> Vec<LeaderboardEntry> {
    // Latest record per athlete by ledger append order
    let mut latest: HashMap<&str, &RatingRecord> = HashMap::new();
    for record in ledger.records().iter().filter(|r| r.competed) {
        if filter.matches(record) {
            latest.insert(record.name.as_str(), record);
        }
    }

    let mut entries: Vec<&RatingRecord> = latest.into_values().collect();
    entries.sort_by(|a, b| {
        b.elo_after
            .partial_cmp(&a.elo_after)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries.truncate(top_n);

    entries
        .into_iter()
        .enumerate()
        .map(|(i, record)| LeaderboardEntry {
            position: i + 1,
            name: record.name.clone(),
            country: record.country.clone(),
            rating: record.elo_after,
        })
        .collect()
}

/// Complete history for one athlete (initialization and competition records),
/// matched case-insensitively, sorted by date ascending.
pub fn athlete_history(ledger: &Ledger, name: &str) -> Vec<RatingRecord> {
    let query = name.trim().to_lowercase();
    let mut history: Vec<RatingRecord> = ledger
        .records()
        .iter()
        .filter(|r| r.name.to_lowercase() == query)
        .cloned()
        .collect();
    history.sort_by_key(|r| r.date);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RoundDescriptor, RoundEntry};
    use chrono::NaiveDate;

    fn record(name: &str, day: &str, discipline: &str, gender: &str, after: f64) -> RatingRecord {
        let descriptor = RoundDescriptor {
            event: "Innsbruck".to_string(),
            date: day.parse::<NaiveDate>().unwrap(),
            discipline: discipline.to_string(),
            gender: gender.to_string(),
            round: "Final".to_string(),
        };
        let entry = RoundEntry {
            athlete: name.to_string(),
            country: None,
            rank: 1,
        };
        RatingRecord::competition(&descriptor, &entry, None, after, 0.0)
    }

    fn sample_ledger() -> Ledger {
        Ledger::from_records(vec![
            RatingRecord::initialization(
                "Adam Ondra".to_string(),
                Some("CZE".to_string()),
                "2023-04-22".parse().unwrap(),
                "Boulder",
                "Men",
                1500.0,
            ),
            record("Adam Ondra", "2023-04-22", "Boulder", "Men", 1516.0),
            record("Adam Ondra", "2023-06-14", "Lead", "Men", 1530.0),
            record("Tomoa Narasaki", "2023-04-22", "Boulder", "Men", 1516.0),
            record("Janja Garnbret", "2023-04-22", "Boulder", "Women", 1540.0),
        ])
    }

    #[test]
    fn test_leaderboard_latest_rating_and_ordering() {
        let board = leaderboard(&sample_ledger(), &LeaderboardFilter::default(), 10);

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].name, "Janja Garnbret");
        assert_eq!(board[0].position, 1);
        // Adam's latest rating is the Lead record, not the Boulder one
        assert_eq!(board[1].name, "Adam Ondra");
        assert_eq!(board[1].rating, 1530.0);
    }

    #[test]
    fn test_leaderboard_filters_case_insensitively() {
        let filter = LeaderboardFilter {
            discipline: Some("boulder".to_string()),
            gender: Some("MEN".to_string()),
        };
        let board = leaderboard(&sample_ledger(), &filter, 10);

        assert_eq!(board.len(), 2);
        // Equal ratings tie-break by name ascending
        assert_eq!(board[0].name, "Adam Ondra");
        assert_eq!(board[1].name, "Tomoa Narasaki");
    }

    #[test]
    fn test_leaderboard_truncates_to_top_n() {
        let board = leaderboard(&sample_ledger(), &LeaderboardFilter::default(), 1);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Janja Garnbret");
    }

    #[test]
    fn test_athlete_history_includes_initialization() {
        let history = athlete_history(&sample_ledger(), "  adam ONDRA ");

        assert_eq!(history.len(), 3);
        assert!(!history[0].competed);
        assert!(history.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_athlete_history_unknown_name_is_empty() {
        assert!(athlete_history(&sample_ledger(), "Nobody").is_empty());
    }

    #[test]
    fn test_accented_names_match_case_insensitively() {
        let ledger = Ledger::from_records(vec![record(
            "Mickaël Mawem",
            "2023-04-22",
            "Boulder",
            "Men",
            1516.0,
        )]);

        // Case folding must cover non-ASCII letters, not just a-z
        let history = athlete_history(&ledger, "MICKAËL MAWEM");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "Mickaël Mawem");

        assert_eq!(athlete_history(&ledger, "mickaël mawem").len(), 1);
    }
}
