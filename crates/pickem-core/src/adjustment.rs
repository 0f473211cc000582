// Situational spread adjustments.
//
// Applied in a fixed order to the raw line: home field, prime time, rest,
// momentum, and finally the division-game dampener on the running value.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::Side;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Everything known about a game before its spread is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SituationalFactors {
    /// Posted spread, non-negative, in the favorite's favor.
    pub raw_spread: f64,
    pub home: Side,
    /// Thursday, Sunday or Monday night game.
    pub prime_time: bool,
    /// Side with a meaningful rest edge (bye vs. short week), if any.
    pub rest_advantage: Option<Side>,
    /// Favorite is on a 3+ game win streak.
    pub favorite_streak: bool,
    /// Underdog is on a 3+ game win streak.
    pub underdog_streak: bool,
    pub division_game: bool,
}

/// Point deltas and the division multiplier. Defaults are the tuned values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentWeights {
    pub underdog_home: f64,
    pub prime_time_favorite_home: f64,
    pub prime_time_underdog_home: f64,
    pub rest_favorite: f64,
    pub rest_underdog: f64,
    pub favorite_streak: f64,
    pub underdog_streak: f64,
    pub division_multiplier: f64,
}

impl Default for AdjustmentWeights {
    fn default() -> Self {
        Self {
            underdog_home: -0.5,
            prime_time_favorite_home: 0.5,
            prime_time_underdog_home: -1.0,
            rest_favorite: 1.0,
            rest_underdog: -1.5,
            favorite_streak: 1.0,
            underdog_streak: -1.0,
            division_multiplier: 0.85,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    UnderdogHome,
    PrimeTime,
    Rest,
    FavoriteMomentum,
    UnderdogMomentum,
    Division,
}

impl AdjustmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AdjustmentKind::UnderdogHome => "underdog_home",
            AdjustmentKind::PrimeTime => "prime_time",
            AdjustmentKind::Rest => "rest",
            AdjustmentKind::FavoriteMomentum => "favorite_momentum",
            AdjustmentKind::UnderdogMomentum => "underdog_momentum",
            AdjustmentKind::Division => "division",
        }
    }
}

/// One applied step, with the running spread before and after it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub before: f64,
    pub after: f64,
}

impl Adjustment {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

/// Result of running the pipeline on one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSpread {
    pub raw: f64,
    pub adjusted: f64,
    pub steps: Vec<Adjustment>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply every situational adjustment that fires for `factors`.
///
/// The result may be negative when the adjustments outweigh the posted line;
/// see [`crate::probability::GameProbability::from_adjusted_spread`].
pub fn adjust_spread(factors: &SituationalFactors, weights: &AdjustmentWeights) -> AdjustedSpread {
    let mut running = factors.raw_spread;
    let mut steps = Vec::new();

    let mut apply = |kind: AdjustmentKind, next: f64, running: &mut f64| {
        steps.push(Adjustment {
            kind,
            before: *running,
            after: next,
        });
        debug!(
            "{} adjustment: {:.2} -> {:.2}",
            kind.label(),
            *running,
            next
        );
        *running = next;
    };

    if factors.home == Side::Underdog {
        apply(
            AdjustmentKind::UnderdogHome,
            running + weights.underdog_home,
            &mut running,
        );
    }

    if factors.prime_time {
        let delta = match factors.home {
            Side::Favorite => weights.prime_time_favorite_home,
            Side::Underdog => weights.prime_time_underdog_home,
        };
        apply(AdjustmentKind::PrimeTime, running + delta, &mut running);
    }

    if let Some(side) = factors.rest_advantage {
        let delta = match side {
            Side::Favorite => weights.rest_favorite,
            Side::Underdog => weights.rest_underdog,
        };
        apply(AdjustmentKind::Rest, running + delta, &mut running);
    }

    if factors.favorite_streak {
        apply(
            AdjustmentKind::FavoriteMomentum,
            running + weights.favorite_streak,
            &mut running,
        );
    }
    if factors.underdog_streak {
        apply(
            AdjustmentKind::UnderdogMomentum,
            running + weights.underdog_streak,
            &mut running,
        );
    }

    if factors.division_game {
        apply(
            AdjustmentKind::Division,
            running * weights.division_multiplier,
            &mut running,
        );
    }

    AdjustedSpread {
        raw: factors.raw_spread,
        adjusted: running,
        steps,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
