// Graded pick history loading.
//
// One CSV row per committed pick: `week,date,favorite,underdog,spread,pick,
// correct`. Blank `correct` marks a game that has not been graded yet.

use chrono::NaiveDate;
use pickem_core::record::PickRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::week::resolve_team;

#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("failed to read results file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in results file: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}

#[derive(Debug, Deserialize)]
struct RawResultRow {
    week: u32,
    #[serde(default)]
    date: String,
    favorite: String,
    underdog: String,
    spread: f64,
    #[serde(default)]
    pick: String,
    #[serde(default)]
    correct: String,
}

fn parse_outcome(value: &str) -> Option<Option<bool>> {
    match value.trim().to_lowercase().as_str() {
        "" => Some(None),
        "y" | "yes" | "true" | "1" | "w" | "win" => Some(Some(true)),
        "n" | "no" | "false" | "0" | "l" | "loss" => Some(Some(false)),
        _ => None,
    }
}

fn parse_result_row(raw: RawResultRow, line: u64) -> Result<PickRecord, ResultsError> {
    let invalid = |message: String| ResultsError::InvalidRow { line, message };

    if !(1..=30).contains(&raw.week) {
        return Err(invalid(format!("week must be 1-30, got {}", raw.week)));
    }
    if !raw.spread.is_finite() || raw.spread < 0.0 {
        return Err(invalid(format!(
            "spread must be a non-negative number, got {}",
            raw.spread
        )));
    }
    let date = match raw.date.trim() {
        "" => None,
        s => Some(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| invalid(format!("bad date '{s}': {e}")))?,
        ),
    };
    let correct = parse_outcome(&raw.correct)
        .ok_or_else(|| invalid(format!("correct must be y/n or blank, got '{}'", raw.correct)))?;
    let pick = if raw.pick.trim().is_empty() {
        String::new()
    } else {
        resolve_team(&raw.pick)
    };

    Ok(PickRecord {
        week: raw.week,
        date,
        favorite: resolve_team(&raw.favorite),
        underdog: resolve_team(&raw.underdog),
        spread: raw.spread,
        pick,
        correct,
    })
}

fn load_results_from_reader<R: Read>(rdr: R) -> Result<Vec<PickRecord>, ResultsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawResultRow = record
            .deserialize(Some(&headers))
            .map_err(|e| ResultsError::InvalidRow {
                line,
                message: e.to_string(),
            })?;
        records.push(parse_result_row(raw, line)?);
    }
    Ok(records)
}

/// Load a pick history file. An empty file is a valid, empty history.
pub fn load_results(path: &Path) -> Result<Vec<PickRecord>, ResultsError> {
    let file = std::fs::File::open(path).map_err(|e| ResultsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let records = load_results_from_reader(file)?;
    info!("Loaded {} picks from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "week,date,favorite,underdog,spread,pick,correct\n";

    fn load(rows: &str) -> Result<Vec<PickRecord>, ResultsError> {
        load_results_from_reader(format!("{HEADER}{rows}").as_bytes())
    }

    #[test]
    fn parses_graded_and_pending_rows() {
        let picks = load("1,2024-09-08,kc,bal,3,Chiefs,y\n2,,buf,mia,2.5,dog,\n").unwrap();
        assert_eq!(picks.len(), 2);

        assert_eq!(picks[0].favorite, "Chiefs");
        assert_eq!(picks[0].underdog, "Ravens");
        assert_eq!(picks[0].pick, "Chiefs");
        assert_eq!(picks[0].date, NaiveDate::from_ymd_opt(2024, 9, 8));
        assert_eq!(picks[0].correct, Some(true));

        assert_eq!(picks[1].date, None);
        assert_eq!(picks[1].pick, "dog");
        assert_eq!(picks[1].correct, None);
    }

    #[test]
    fn pick_abbreviation_matches_resolved_team() {
        let picks = load("5,,Chiefs,Raiders,7,lv,n\n").unwrap();
        assert_eq!(picks[0].pick, "Raiders");
        assert_eq!(picks[0].pick, picks[0].underdog);
    }

    #[test]
    fn rejects_bad_outcome() {
        let err = load("1,,kc,bal,3,kc,push\n").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidRow { line: 2, .. }), "got: {err}");
    }

    #[test]
    fn rejects_bad_date() {
        let err = load("1,09/08/2024,kc,bal,3,kc,y\n").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidRow { .. }), "got: {err}");
    }

    #[test]
    fn rejects_out_of_range_week() {
        let err = load("0,,kc,bal,3,kc,y\n").unwrap_err();
        assert!(matches!(err, ResultsError::InvalidRow { .. }), "got: {err}");
    }

    #[test]
    fn header_only_is_empty_history() {
        assert!(load("").unwrap().is_empty());
    }
}
