// Command orchestration: turns the loaded config, week files and pick
// histories into the JSON-ready reports the binary prints.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use pickem_core::optimizer::OptimizerError;
use pickem_core::record::{analyze_performance, PerformanceReport};
use pickem_core::tiebreak::tiebreaker_total;
use pickem_core::{generate_slates, GameProbability, SearchMethod, SlateResult};

use crate::config::Config;
use crate::results::load_results;
use crate::week::{adjust_week, load_week, AdjustedGame};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Command-line overrides for one slate run. `None` means "use the config".
#[derive(Debug, Clone, Default)]
pub struct SlateRequest {
    pub week_path: PathBuf,
    pub week: Option<u32>,
    pub year: Option<i32>,
    pub seed: Option<u64>,
    pub method: Option<SearchMethod>,
    pub num_slates: Option<usize>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Per-game line as fed to the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub favorite: String,
    pub underdog: String,
    pub raw_spread: f64,
    pub adjusted_spread: f64,
    pub favorite_probability: f64,
    pub underdog_probability: f64,
}

impl GameSummary {
    fn from_adjusted(game: &AdjustedGame) -> Self {
        let p = GameProbability::from_adjusted_spread(game.spread.adjusted);
        Self {
            favorite: game.favorite.clone(),
            underdog: game.underdog.clone(),
            raw_spread: game.spread.raw,
            adjusted_spread: game.spread.adjusted,
            favorite_probability: p.favorite,
            underdog_probability: p.underdog,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateReport {
    pub week: Option<u32>,
    pub year: i32,
    pub method: SearchMethod,
    pub games: Vec<GameSummary>,
    pub slates: Vec<SlateResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiebreakerReport {
    pub over_under: f64,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityReport {
    pub adjusted_spread: f64,
    pub favorite_probability: f64,
    pub underdog_probability: f64,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Seeded when a seed is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Optimize an already adjusted week.
pub fn build_slate_report<R: Rng + ?Sized>(
    config: &Config,
    games: &[AdjustedGame],
    request: &SlateRequest,
    rng: &mut R,
) -> Result<SlateReport, OptimizerError> {
    let mut params = config.optimizer.params;
    if let Some(n) = request.num_slates {
        params.num_slates = n;
    }
    let method = request.method.unwrap_or(config.optimizer.method);

    let core_games: Vec<_> = games.iter().map(AdjustedGame::to_game).collect();
    let run = generate_slates(
        &core_games,
        &params,
        method,
        config.optimizer.auto_exhaustive_limit,
        rng,
    )?;

    Ok(SlateReport {
        week: request.week,
        year: request.year.unwrap_or_else(|| chrono::Local::now().year()),
        method: run.method,
        games: games.iter().map(GameSummary::from_adjusted).collect(),
        slates: run.slates,
    })
}

/// Load, adjust and optimize the week named in `request`.
pub fn run_slates(config: &Config, request: &SlateRequest) -> anyhow::Result<SlateReport> {
    let entries = load_week(&request.week_path)
        .with_context(|| format!("failed to load week file {}", request.week_path.display()))?;
    let adjusted = adjust_week(&entries, &config.adjustments);

    let seed = request.seed.or(config.optimizer.seed);
    let mut rng = make_rng(seed);
    let report = build_slate_report(config, &adjusted, request, &mut rng)
        .context("slate optimization failed")?;

    info!(
        "Produced {} slates for {} games (week {:?}, {})",
        report.slates.len(),
        report.games.len(),
        report.week,
        report.year
    );
    Ok(report)
}

/// Sample a tiebreaker total for the posted over/under.
pub fn run_tiebreaker(
    config: &Config,
    over_under: f64,
    seed: Option<u64>,
) -> anyhow::Result<TiebreakerReport> {
    let mut rng = make_rng(seed.or(config.optimizer.seed));
    let total = tiebreaker_total(over_under, &config.tiebreaker_totals, &mut rng)
        .context("no tiebreaker totals configured")?;
    info!("Tiebreaker for over/under {}: {}", over_under, total);
    Ok(TiebreakerReport { over_under, total })
}

/// Win-loss breakdowns over a graded pick history.
pub fn run_record(path: &Path) -> anyhow::Result<PerformanceReport> {
    let picks = load_results(path)
        .with_context(|| format!("failed to load results file {}", path.display()))?;
    let report = analyze_performance(&picks);
    match &report.overall {
        Some(line) => info!(
            "Overall record {}-{} ({:.1}%)",
            line.wins, line.losses, line.win_pct
        ),
        None => info!("No graded picks in {}", path.display()),
    }
    Ok(report)
}

pub fn run_probability(adjusted_spread: f64) -> ProbabilityReport {
    let p = GameProbability::from_adjusted_spread(adjusted_spread);
    ProbabilityReport {
        adjusted_spread,
        favorite_probability: p.favorite,
        underdog_probability: p.underdog,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
