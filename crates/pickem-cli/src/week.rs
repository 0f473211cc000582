// Week file loading.
//
// One CSV row per game: the posted line plus the situational flags the
// adjustment pipeline needs. Unlike projection-style data, a bad row is never
// skipped: dropping a game would silently change every slate.

use pickem_core::adjustment::{adjust_spread, AdjustedSpread, AdjustmentWeights, SituationalFactors};
use pickem_core::teams::{is_division_game, Team};
use pickem_core::{Game, Side};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A game as entered, before its spread is adjusted.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEntry {
    pub favorite: String,
    pub underdog: String,
    pub factors: SituationalFactors,
}

impl GameEntry {
    /// Run the adjustment pipeline over this entry.
    pub fn adjust(&self, weights: &AdjustmentWeights) -> AdjustedGame {
        debug!("Adjusting {} over {}", self.favorite, self.underdog);
        AdjustedGame {
            favorite: self.favorite.clone(),
            underdog: self.underdog.clone(),
            spread: adjust_spread(&self.factors, weights),
        }
    }
}

/// A game with its adjustment trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedGame {
    pub favorite: String,
    pub underdog: String,
    pub spread: AdjustedSpread,
}

impl AdjustedGame {
    pub fn to_game(&self) -> Game {
        Game::new(&*self.favorite, &*self.underdog, self.spread.adjusted)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WeekError {
    #[error("failed to read week file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in week file: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("line {line}: {team} already plays on line {first_line}")]
    DuplicateTeam {
        team: String,
        line: u64,
        first_line: u64,
    },

    #[error("week file contains no games")]
    Empty,
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawWeekRow {
    favorite: String,
    underdog: String,
    spread: f64,
    #[serde(default)]
    home: String,
    #[serde(default)]
    prime_time: String,
    #[serde(default)]
    rest: String,
    #[serde(default)]
    favorite_streak: String,
    #[serde(default)]
    underdog_streak: String,
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Canonical nickname for a known franchise; anything else is kept as typed.
pub(crate) fn resolve_team(name: &str) -> String {
    match Team::parse(name) {
        Some(team) => team.nickname().to_string(),
        None => name.trim().to_string(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "n" | "no" | "false" => Some(false),
        "y" | "yes" | "true" => Some(true),
        _ => None,
    }
}

fn parse_rest(value: &str) -> Option<Option<Side>> {
    match value.trim().to_lowercase().as_str() {
        "" | "n" | "neither" => Some(None),
        other => Side::parse(other).map(Some),
    }
}

fn row_error(line: u64, message: impl Into<String>) -> WeekError {
    WeekError::InvalidRow {
        line,
        message: message.into(),
    }
}

fn parse_row(raw: RawWeekRow, line: u64) -> Result<GameEntry, WeekError> {
    let favorite = resolve_team(&raw.favorite);
    let underdog = resolve_team(&raw.underdog);
    if favorite.is_empty() || underdog.is_empty() {
        return Err(row_error(line, "favorite and underdog are required"));
    }
    if favorite.eq_ignore_ascii_case(&underdog) {
        return Err(row_error(line, format!("{favorite} cannot play itself")));
    }
    if !raw.spread.is_finite() || raw.spread < 0.0 {
        return Err(row_error(
            line,
            format!("spread must be a non-negative number, got {}", raw.spread),
        ));
    }

    let home = Side::parse(&raw.home).ok_or_else(|| {
        row_error(line, format!("home must name the favorite or underdog, got '{}'", raw.home))
    })?;
    let rest_advantage = parse_rest(&raw.rest)
        .ok_or_else(|| row_error(line, format!("unrecognized rest value '{}'", raw.rest)))?;
    let flag = |field: &str, value: &str| {
        parse_flag(value)
            .ok_or_else(|| row_error(line, format!("{field} must be y/n, got '{value}'")))
    };

    let factors = SituationalFactors {
        raw_spread: raw.spread,
        home,
        prime_time: flag("prime_time", &raw.prime_time)?,
        rest_advantage,
        favorite_streak: flag("favorite_streak", &raw.favorite_streak)?,
        underdog_streak: flag("underdog_streak", &raw.underdog_streak)?,
        division_game: is_division_game(&favorite, &underdog),
    };

    Ok(GameEntry {
        favorite,
        underdog,
        factors,
    })
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_week_from_reader<R: Read>(rdr: R) -> Result<Vec<GameEntry>, WeekError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let headers = reader.headers()?.clone();

    let mut entries = Vec::new();
    let mut seen: HashMap<String, u64> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawWeekRow = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(line, e.to_string()))?;
        let entry = parse_row(raw, line)?;

        for team in [&entry.favorite, &entry.underdog] {
            if let Some(&first_line) = seen.get(&team.to_lowercase()) {
                return Err(WeekError::DuplicateTeam {
                    team: team.clone(),
                    line,
                    first_line,
                });
            }
        }
        seen.insert(entry.favorite.to_lowercase(), line);
        seen.insert(entry.underdog.to_lowercase(), line);
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(WeekError::Empty);
    }
    Ok(entries)
}

/// Load and validate a week file.
pub fn load_week(path: &Path) -> Result<Vec<GameEntry>, WeekError> {
    let file = std::fs::File::open(path).map_err(|e| WeekError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let entries = load_week_from_reader(file)?;
    info!("Loaded {} games from {}", entries.len(), path.display());
    Ok(entries)
}

/// Adjust every entry with the same weights, preserving order.
pub fn adjust_week(entries: &[GameEntry], weights: &AdjustmentWeights) -> Vec<AdjustedGame> {
    entries.iter().map(|e| e.adjust(weights)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
