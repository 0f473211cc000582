// Slate optimizer: picks one side per game to balance joint win probability
// against underdog variety.
//
// Two strategies share the same ranking semantics: a genetic search over pick
// vectors, and full enumeration for weeks small enough to afford 2^n
// evaluations.

pub mod exhaustive;
pub mod fitness;
pub mod genetic;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::game::{Game, Side};
use fitness::{FitnessContext, FitnessResult};

pub use exhaustive::{enumerate_slates, MAX_EXHAUSTIVE_GAMES};
pub use genetic::{next_generation, optimize};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Tunables for a slate search. Defaults are the empirically tuned values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParams {
    pub num_slates: usize,
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub underdog_bonus: f64,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            num_slates: 5,
            population_size: 500,
            generations: 300,
            mutation_rate: 0.07,
            underdog_bonus: 0.45,
        }
    }
}

/// Which search strategy produced (or should produce) a set of slates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Genetic,
    Exhaustive,
    /// Exhaustive up to a game-count limit, genetic beyond it.
    #[default]
    Auto,
}

impl SearchMethod {
    /// Resolve `Auto` into a concrete strategy for `num_games`.
    pub fn resolve(self, num_games: usize, auto_exhaustive_limit: usize) -> SearchMethod {
        match self {
            SearchMethod::Auto if num_games <= auto_exhaustive_limit.min(MAX_EXHAUSTIVE_GAMES) => {
                SearchMethod::Exhaustive
            }
            SearchMethod::Auto => SearchMethod::Genetic,
            other => other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchMethod::Genetic => "genetic",
            SearchMethod::Exhaustive => "exhaustive",
            SearchMethod::Auto => "auto",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizerError {
    #[error("exhaustive search over {games} games exceeds the limit of {max}")]
    TooManyGames { games: usize, max: usize },
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One ranked slate returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateResult {
    /// Picked team per game, in input order.
    pub picks: Vec<String>,
    pub sides: Vec<Side>,
    pub fitness: f64,
    pub overall_probability: f64,
    pub underdog_count: usize,
}

impl SlateResult {
    pub(crate) fn build(games: &[Game], sides: Vec<Side>, score: FitnessResult) -> Self {
        let picks = games
            .iter()
            .zip(&sides)
            .map(|(game, side)| game.team(*side).to_string())
            .collect();
        Self {
            picks,
            sides,
            fitness: score.fitness,
            overall_probability: score.overall_probability,
            underdog_count: score.underdog_count,
        }
    }
}

/// Output of [`generate_slates`]: the concrete strategy used and its slates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateRun {
    pub method: SearchMethod,
    pub slates: Vec<SlateResult>,
}

/// Rank already-deduplicated candidates and keep the best `num_slates`.
pub(crate) fn rank(
    games: &[Game],
    ctx: &FitnessContext,
    candidates: Vec<Vec<Side>>,
    num_slates: usize,
) -> Vec<SlateResult> {
    let mut scored: Vec<(Vec<Side>, FitnessResult)> = candidates
        .into_iter()
        .map(|ind| {
            let score = ctx.evaluate(&ind);
            (ind, score)
        })
        .collect();
    scored.sort_by(|a, b| fitness::by_fitness_desc(a.1.fitness, b.1.fitness));
    scored
        .into_iter()
        .take(num_slates)
        .map(|(sides, score)| SlateResult::build(games, sides, score))
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the requested strategy over `games`.
///
/// `Auto` enumerates exhaustively when the week has at most
/// `auto_exhaustive_limit` games and falls back to the genetic search
/// otherwise. Requesting `Exhaustive` for more than
/// [`MAX_EXHAUSTIVE_GAMES`] games is an error.
pub fn generate_slates<R: Rng + ?Sized>(
    games: &[Game],
    params: &OptimizerParams,
    method: SearchMethod,
    auto_exhaustive_limit: usize,
    rng: &mut R,
) -> Result<SlateRun, OptimizerError> {
    let method = method.resolve(games.len(), auto_exhaustive_limit);
    info!(
        "Generating up to {} slates for {} games via {} search",
        params.num_slates,
        games.len(),
        method.label()
    );

    let slates = match method {
        SearchMethod::Exhaustive => enumerate_slates(games, params)?,
        _ => optimize(games, params, rng),
    };

    if let Some(best) = slates.first() {
        info!(
            "Best slate: fitness={:.4}, success chance={:.4}%, {} underdog(s)",
            best.fitness,
            best.overall_probability * 100.0,
            best.underdog_count
        );
    }

    Ok(SlateRun { method, slates })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn games(n: usize) -> Vec<Game> {
        (0..n)
            .map(|i| Game::new(format!("F{i}"), format!("U{i}"), (i % 10) as f64 + 0.5))
            .collect()
    }

    #[test]
    fn defaults_match_tuned_values() {
        let p = OptimizerParams::default();
        assert_eq!(p.num_slates, 5);
        assert_eq!(p.population_size, 500);
        assert_eq!(p.generations, 300);
        assert!((p.mutation_rate - 0.07).abs() < f64::EPSILON);
        assert!((p.underdog_bonus - 0.45).abs() < f64::EPSILON);
    }

    #[test]
    fn auto_resolves_by_game_count() {
        assert_eq!(SearchMethod::Auto.resolve(10, 12), SearchMethod::Exhaustive);
        assert_eq!(SearchMethod::Auto.resolve(12, 12), SearchMethod::Exhaustive);
        assert_eq!(SearchMethod::Auto.resolve(13, 12), SearchMethod::Genetic);
        // The hard cap wins over a generous configured limit.
        assert_eq!(SearchMethod::Auto.resolve(25, 64), SearchMethod::Genetic);
        assert_eq!(SearchMethod::Genetic.resolve(2, 12), SearchMethod::Genetic);
        assert_eq!(SearchMethod::Exhaustive.resolve(30, 12), SearchMethod::Exhaustive);
    }

    #[test]
    fn generate_reports_concrete_method() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = OptimizerParams {
            population_size: 40,
            generations: 10,
            ..OptimizerParams::default()
        };
        let run = generate_slates(&games(4), &params, SearchMethod::Auto, 12, &mut rng).unwrap();
        assert_eq!(run.method, SearchMethod::Exhaustive);
        assert_eq!(run.slates.len(), 5);

        let run = generate_slates(&games(4), &params, SearchMethod::Genetic, 12, &mut rng).unwrap();
        assert_eq!(run.method, SearchMethod::Genetic);
        assert!(run.slates.len() <= 5);
    }

    #[test]
    fn exhaustive_over_cap_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_slates(
            &games(MAX_EXHAUSTIVE_GAMES + 1),
            &OptimizerParams::default(),
            SearchMethod::Exhaustive,
            12,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            OptimizerError::TooManyGames {
                games: MAX_EXHAUSTIVE_GAMES + 1,
                max: MAX_EXHAUSTIVE_GAMES
            }
        );
    }

    #[test]
    fn params_deserialize_with_partial_fields() {
        let p: OptimizerParams = serde_json::from_str(r#"{"num_slates": 3}"#).unwrap();
        assert_eq!(p.num_slates, 3);
        assert_eq!(p.population_size, 500);
    }

    #[test]
    fn slate_result_maps_sides_to_teams() {
        let g = vec![Game::new("A", "B", 3.0), Game::new("C", "D", 7.0)];
        let ctx = FitnessContext::new(&g, 0.45);
        let sides = vec![Side::Underdog, Side::Favorite];
        let score = ctx.evaluate(&sides);
        let slate = SlateResult::build(&g, sides, score);
        assert_eq!(slate.picks, vec!["B".to_string(), "C".to_string()]);
        assert_eq!(slate.underdog_count, 1);
    }
}
