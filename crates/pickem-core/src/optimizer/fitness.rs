// Slate fitness: joint win probability scaled by an underdog bonus.

use std::cmp::Ordering;

use crate::game::{Game, Side};
use crate::probability::GameProbability;

/// A candidate slate: one side per game, aligned with the input game list.
pub type Individual = Vec<Side>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessResult {
    pub fitness: f64,
    pub overall_probability: f64,
    pub underdog_count: usize,
}

/// Per-game probabilities plus the bonus, resolved once per optimizer call.
#[derive(Debug, Clone)]
pub struct FitnessContext {
    pub probabilities: Vec<GameProbability>,
    /// Games whose two labels name the same team. Only the favorite pick
    /// exists there, so an underdog gene is read as the favorite.
    pub locked: Vec<bool>,
    pub underdog_bonus: f64,
}

impl FitnessContext {
    pub fn new(games: &[Game], underdog_bonus: f64) -> Self {
        Self {
            probabilities: games.iter().map(Game::probability).collect(),
            locked: games.iter().map(|g| g.favorite == g.underdog).collect(),
            underdog_bonus,
        }
    }

    /// `overall = Π p(pick)`, `fitness = overall * (1 + bonus * underdogs)`.
    pub fn evaluate(&self, individual: &[Side]) -> FitnessResult {
        let mut overall_probability = 1.0;
        let mut underdog_count = 0;
        let games = self.probabilities.iter().zip(&self.locked);
        for (&side, (probs, &locked)) in individual.iter().zip(games) {
            let side = if locked { Side::Favorite } else { side };
            overall_probability *= probs.of(side);
            if side == Side::Underdog {
                underdog_count += 1;
            }
        }
        let fitness =
            overall_probability * (1.0 + self.underdog_bonus * underdog_count as f64);
        FitnessResult {
            fitness,
            overall_probability,
            underdog_count,
        }
    }

    /// Rewrite locked games to the favorite so equal pick lists compare equal.
    pub fn canonicalize(&self, individual: &mut [Side]) {
        for (side, &locked) in individual.iter_mut().zip(&self.locked) {
            if locked {
                *side = Side::Favorite;
            }
        }
    }
}

/// Descending order on fitness with NaN sorted after every real value.
pub fn by_fitness_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
