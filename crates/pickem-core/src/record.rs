// Pick record analysis: win/loss breakdowns over picks with known outcomes.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Raw-spread bands, `[low, high)`.
pub const SPREAD_BANDS: [(f64, f64); 4] = [(0.0, 3.5), (3.5, 6.5), (6.5, 9.5), (9.5, 100.0)];

/// First month of a new NFL season. January games belong to the prior season.
const SEASON_START_MONTH: u32 = 9;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One committed pick. `correct` is `None` until the game is graded.
#[derive(Debug, Clone, PartialEq)]
pub struct PickRecord {
    pub week: u32,
    pub date: Option<NaiveDate>,
    pub favorite: String,
    pub underdog: String,
    /// Posted (unadjusted) spread.
    pub spread: f64,
    pub pick: String,
    pub correct: Option<bool>,
}

/// Which side of the line a pick took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickType {
    Favorite,
    Underdog,
    /// The pick names neither team in the game.
    Unknown,
}

impl PickType {
    pub fn of(record: &PickRecord) -> Self {
        if record.pick == record.favorite {
            PickType::Favorite
        } else if record.pick == record.underdog {
            PickType::Underdog
        } else {
            PickType::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PickType::Favorite => "favorite",
            PickType::Underdog => "underdog",
            PickType::Unknown => "unknown",
        }
    }
}

/// NFL season a date falls in (September through the following summer).
pub fn season_of(date: NaiveDate) -> i32 {
    if date.month() >= SEASON_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    wins: u32,
    losses: u32,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        if correct {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    fn line(self, label: impl Into<String>) -> RecordLine {
        let total = self.wins + self.losses;
        RecordLine {
            label: label.into(),
            wins: self.wins,
            losses: self.losses,
            win_pct: if total == 0 {
                0.0
            } else {
                self.wins as f64 / total as f64 * 100.0
            },
        }
    }
}

/// A labelled win-loss line. `win_pct` is a percentage (0-100).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordLine {
    pub label: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
}

/// Every breakdown over the graded picks. Empty groups are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// `None` when no pick has been graded yet.
    pub overall: Option<RecordLine>,
    pub by_spread: Vec<RecordLine>,
    /// Most recent season first. Undated picks are left out.
    pub by_season: Vec<RecordLine>,
    pub by_week: Vec<RecordLine>,
    pub by_pick_type: Vec<RecordLine>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Summarize graded picks; ungraded ones (`correct == None`) are ignored.
pub fn analyze_performance(records: &[PickRecord]) -> PerformanceReport {
    let mut overall = Tally::default();
    let mut bands = [Tally::default(); SPREAD_BANDS.len()];
    let mut seasons: BTreeMap<i32, Tally> = BTreeMap::new();
    let mut weeks: BTreeMap<u32, Tally> = BTreeMap::new();
    let mut types: BTreeMap<PickType, Tally> = BTreeMap::new();

    for record in records {
        let Some(correct) = record.correct else {
            continue;
        };
        overall.add(correct);

        if let Some(i) = SPREAD_BANDS
            .iter()
            .position(|&(low, high)| record.spread >= low && record.spread < high)
        {
            bands[i].add(correct);
        }
        if let Some(date) = record.date {
            seasons.entry(season_of(date)).or_default().add(correct);
        }
        weeks.entry(record.week).or_default().add(correct);
        if !record.pick.is_empty() {
            types.entry(PickType::of(record)).or_default().add(correct);
        }
    }

    if overall == Tally::default() {
        return PerformanceReport {
            overall: None,
            by_spread: Vec::new(),
            by_season: Vec::new(),
            by_week: Vec::new(),
            by_pick_type: Vec::new(),
        };
    }

    PerformanceReport {
        overall: Some(overall.line("overall")),
        by_spread: SPREAD_BANDS
            .iter()
            .zip(bands)
            .filter(|(_, t)| *t != Tally::default())
            .map(|(&(low, high), t)| t.line(format!("{low}-{high}")))
            .collect(),
        by_season: seasons
            .into_iter()
            .rev()
            .map(|(season, t)| t.line(season.to_string()))
            .collect(),
        by_week: weeks
            .into_iter()
            .map(|(week, t)| t.line(format!("Week {week}")))
            .collect(),
        by_pick_type: types
            .into_iter()
            .map(|(kind, t)| t.line(kind.label()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
