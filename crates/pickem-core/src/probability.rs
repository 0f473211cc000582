// Spread-to-win-probability model.
//
// Maps the magnitude of a point spread to the favored side's historical win
// rate through a fixed step table.

use serde::{Deserialize, Serialize};

use crate::game::Side;

/// Win probability for a pick'em (spread below the first threshold).
pub const COIN_FLIP: f64 = 0.50;

/// `(lower bound, probability)` rows in ascending order. A magnitude at or
/// above a bound takes that row's probability until the next bound.
const SPREAD_TABLE: &[(f64, f64)] = &[
    (0.5, 0.53),
    (1.5, 0.56),
    (2.5, 0.60),
    (3.5, 0.65),
    (4.5, 0.68),
    (5.5, 0.71),
    (6.5, 0.75),
    (7.5, 0.79),
    (9.0, 0.83),
    (10.5, 0.87),
    (13.5, 0.91),
    (16.5, 0.93),
];

/// Favored side's win probability for a spread of the given magnitude.
///
/// Non-decreasing in `magnitude`. Negative inputs and NaN fall below every
/// bound and return [`COIN_FLIP`]; callers pass `abs()` of a signed spread.
pub fn win_probability(magnitude: f64) -> f64 {
    let mut p = COIN_FLIP;
    for &(bound, prob) in SPREAD_TABLE {
        if magnitude >= bound {
            p = prob;
        } else {
            break;
        }
    }
    p
}

/// Win probabilities for both sides of one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameProbability {
    pub favorite: f64,
    pub underdog: f64,
}

impl GameProbability {
    /// Derive both sides' probabilities from an adjusted spread.
    ///
    /// A negative spread means the adjustments moved the line past zero: the
    /// underdog is now favored by `|spread|`. The favorite/underdog labels are
    /// not swapped; only the probabilities are.
    pub fn from_adjusted_spread(adjusted_spread: f64) -> Self {
        if adjusted_spread >= 0.0 {
            let favorite = win_probability(adjusted_spread);
            Self {
                favorite,
                underdog: 1.0 - favorite,
            }
        } else {
            let underdog = win_probability(adjusted_spread.abs());
            Self {
                favorite: 1.0 - underdog,
                underdog,
            }
        }
    }

    /// Probability of the given side winning.
    pub fn of(&self, side: Side) -> f64 {
        match side {
            Side::Favorite => self.favorite,
            Side::Underdog => self.underdog,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
