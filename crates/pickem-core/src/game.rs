// Game and pick-side types shared by the adjustment pipeline and optimizer.

use serde::{Deserialize, Serialize};

use crate::probability::GameProbability;

/// Which side of a game a pick (or an advantage) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Favorite,
    Underdog,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Side::Favorite => Side::Underdog,
            Side::Underdog => Side::Favorite,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Favorite => "favorite",
            Side::Underdog => "underdog",
        }
    }

    /// Parse the short forms accepted in week files: `f`/`fav`/`favorite`
    /// and `u`/`und`/`dog`/`underdog`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "f" | "fav" | "favorite" => Some(Side::Favorite),
            "u" | "und" | "dog" | "underdog" => Some(Side::Underdog),
            _ => None,
        }
    }
}

/// One scheduled contest with its finalized (adjusted) spread.
///
/// `favorite` and `underdog` are the labels assigned when the line was
/// entered. They stay fixed even if `adjusted_spread` goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub favorite: String,
    pub underdog: String,
    pub adjusted_spread: f64,
}

impl Game {
    pub fn new(
        favorite: impl Into<String>,
        underdog: impl Into<String>,
        adjusted_spread: f64,
    ) -> Self {
        Self {
            favorite: favorite.into(),
            underdog: underdog.into(),
            adjusted_spread,
        }
    }

    /// Team identifier for the given side.
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Favorite => &self.favorite,
            Side::Underdog => &self.underdog,
        }
    }

    pub fn probability(&self) -> GameProbability {
        GameProbability::from_adjusted_spread(self.adjusted_spread)
    }
}
