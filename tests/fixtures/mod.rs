//! Shared fixtures for integration tests

use chrono::NaiveDate;
use crux_rating::types::ResultRow;

/// Build a result row with the common fields filled in
pub fn row(name: &str, rank: u32, event: &str, date: &str, round: &str) -> ResultRow {
    ResultRow {
        name: name.to_string(),
        country: None,
        rank: Some(rank),
        event_name: event.to_string(),
        date: Some(date.parse::<NaiveDate>().unwrap()),
        discipline: "Boulder".to_string(),
        gender: "Men".to_string(),
        round: round.to_string(),
    }
}

/// A small two-event season: qualification and final in Hachioji, then a
/// final in Innsbruck with one newcomer.
pub fn sample_season() -> Vec<ResultRow> {
    vec![
        row("adam ondra", 2, "Hachioji", "2023-04-22", "Qualification"),
        row("tomoa narasaki", 1, "Hachioji", "2023-04-22", "Qualification"),
        row("sorato anraku", 3, "Hachioji", "2023-04-22", "Qualification"),
        row("adam ondra", 1, "Hachioji", "2023-04-22", "Final"),
        row("tomoa narasaki", 2, "Hachioji", "2023-04-22", "Final"),
        row("adam ondra", 1, "Innsbruck", "2023-06-14", "Final"),
        row("sorato anraku", 2, "Innsbruck", "2023-06-14", "Final"),
        row("mejdi schalck", 3, "Innsbruck", "2023-06-14", "Final"),
    ]
}
