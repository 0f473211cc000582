// Full enumeration of every pick combination.

use tracing::info;

use super::fitness::{by_fitness_desc, FitnessContext, FitnessResult};
use super::{OptimizerError, OptimizerParams, SlateResult};
use crate::game::{Game, Side};

/// Largest week enumerated exhaustively (2^20 combinations).
pub const MAX_EXHAUSTIVE_GAMES: usize = 20;

/// Evaluate all `2^n` slates and return the best `params.num_slates`.
///
/// Ranking matches [`super::optimize`]: fitness descending, NaN last, ties
/// kept in enumeration order (all-favorites first). Only `num_slates` and
/// `underdog_bonus` are read from `params`.
pub fn enumerate_slates(
    games: &[Game],
    params: &OptimizerParams,
) -> Result<Vec<SlateResult>, OptimizerError> {
    let n = games.len();
    if n > MAX_EXHAUSTIVE_GAMES {
        return Err(OptimizerError::TooManyGames {
            games: n,
            max: MAX_EXHAUSTIVE_GAMES,
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let ctx = FitnessContext::new(games, params.underdog_bonus);
    let total: u32 = 1 << n;
    // A self-matchup has no underdog pick, so its bit is never set.
    let locked_mask: u32 = ctx
        .locked
        .iter()
        .enumerate()
        .filter(|&(_, &locked)| locked)
        .fold(0, |mask, (i, _)| mask | (1 << i));

    // Score by bitmask first; only the survivors are materialized as slates.
    let mut scored: Vec<(u32, FitnessResult)> = (0..total)
        .filter(|mask| mask & locked_mask == 0)
        .map(|mask| (mask, ctx.evaluate(&sides_for(mask, n))))
        .collect();
    scored.sort_by(|a, b| by_fitness_desc(a.1.fitness, b.1.fitness));
    scored.truncate(params.num_slates);

    info!("Enumerated {} combinations for {} games", total >> locked_mask.count_ones(), n);

    Ok(scored
        .into_iter()
        .map(|(mask, score)| SlateResult::build(games, sides_for(mask, n), score))
        .collect())
}

/// Bit `i` set means game `i` is picked for the underdog.
fn sides_for(mask: u32, n: usize) -> Vec<Side> {
    (0..n)
        .map(|i| {
            if (mask >> i) & 1 == 1 {
                Side::Underdog
            } else {
                Side::Favorite
            }
        })
        .collect()
}
