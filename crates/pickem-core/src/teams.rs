// Franchise table: abbreviations, nicknames, and divisional alignment.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Conference / division
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    Afc,
    Nfc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    East,
    North,
    South,
    West,
}

/// A four-team division, e.g. AFC West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Division {
    pub conference: Conference,
    pub region: Region,
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = match self.conference {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        };
        let region = match self.region {
            Region::East => "East",
            Region::North => "North",
            Region::South => "South",
            Region::West => "West",
        };
        write!(f, "{conf} {region}")
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Cardinals,
    Falcons,
    Ravens,
    Bills,
    Panthers,
    Bears,
    Bengals,
    Browns,
    Cowboys,
    Broncos,
    Lions,
    Packers,
    Texans,
    Colts,
    Jaguars,
    Chiefs,
    Chargers,
    Rams,
    Raiders,
    Dolphins,
    Vikings,
    Patriots,
    Saints,
    Giants,
    Jets,
    Eagles,
    Steelers,
    Seahawks,
    FortyNiners,
    Buccaneers,
    Titans,
    Commanders,
}

/// Every franchise, ordered by abbreviation.
pub const ALL_TEAMS: [Team; 32] = [
    Team::Cardinals,
    Team::Falcons,
    Team::Ravens,
    Team::Bills,
    Team::Panthers,
    Team::Bears,
    Team::Bengals,
    Team::Browns,
    Team::Cowboys,
    Team::Broncos,
    Team::Lions,
    Team::Packers,
    Team::Texans,
    Team::Colts,
    Team::Jaguars,
    Team::Chiefs,
    Team::Chargers,
    Team::Rams,
    Team::Raiders,
    Team::Dolphins,
    Team::Vikings,
    Team::Patriots,
    Team::Saints,
    Team::Giants,
    Team::Jets,
    Team::Eagles,
    Team::Steelers,
    Team::Seahawks,
    Team::FortyNiners,
    Team::Buccaneers,
    Team::Titans,
    Team::Commanders,
];

impl Team {
    /// Lowercase short code ("kc", "sf", "mn", ...).
    pub fn abbr(&self) -> &'static str {
        match self {
            Team::Cardinals => "ari",
            Team::Falcons => "atl",
            Team::Ravens => "bal",
            Team::Bills => "buf",
            Team::Panthers => "car",
            Team::Bears => "chi",
            Team::Bengals => "cin",
            Team::Browns => "cle",
            Team::Cowboys => "dal",
            Team::Broncos => "den",
            Team::Lions => "det",
            Team::Packers => "gb",
            Team::Texans => "hou",
            Team::Colts => "ind",
            Team::Jaguars => "jax",
            Team::Chiefs => "kc",
            Team::Chargers => "lac",
            Team::Rams => "lar",
            Team::Raiders => "lv",
            Team::Dolphins => "mia",
            Team::Vikings => "mn",
            Team::Patriots => "ne",
            Team::Saints => "no",
            Team::Giants => "nyg",
            Team::Jets => "nyj",
            Team::Eagles => "phi",
            Team::Steelers => "pit",
            Team::Seahawks => "sea",
            Team::FortyNiners => "sf",
            Team::Buccaneers => "tb",
            Team::Titans => "ten",
            Team::Commanders => "was",
        }
    }

    /// Display name used as the team identifier in games and slates.
    pub fn nickname(&self) -> &'static str {
        match self {
            Team::Cardinals => "Cardinals",
            Team::Falcons => "Falcons",
            Team::Ravens => "Ravens",
            Team::Bills => "Bills",
            Team::Panthers => "Panthers",
            Team::Bears => "Bears",
            Team::Bengals => "Bengals",
            Team::Browns => "Browns",
            Team::Cowboys => "Cowboys",
            Team::Broncos => "Broncos",
            Team::Lions => "Lions",
            Team::Packers => "Packers",
            Team::Texans => "Texans",
            Team::Colts => "Colts",
            Team::Jaguars => "Jaguars",
            Team::Chiefs => "Chiefs",
            Team::Chargers => "Chargers",
            Team::Rams => "Rams",
            Team::Raiders => "Raiders",
            Team::Dolphins => "Dolphins",
            Team::Vikings => "Vikings",
            Team::Patriots => "Patriots",
            Team::Saints => "Saints",
            Team::Giants => "Giants",
            Team::Jets => "Jets",
            Team::Eagles => "Eagles",
            Team::Steelers => "Steelers",
            Team::Seahawks => "Seahawks",
            Team::FortyNiners => "49ers",
            Team::Buccaneers => "Buccaneers",
            Team::Titans => "Titans",
            Team::Commanders => "Commanders",
        }
    }

    pub fn division(&self) -> Division {
        use Conference::*;
        use Region::*;
        let (conference, region) = match self {
            Team::Bills | Team::Dolphins | Team::Patriots | Team::Jets => (Afc, East),
            Team::Ravens | Team::Bengals | Team::Browns | Team::Steelers => (Afc, North),
            Team::Texans | Team::Colts | Team::Jaguars | Team::Titans => (Afc, South),
            Team::Broncos | Team::Chiefs | Team::Chargers | Team::Raiders => (Afc, West),
            Team::Cowboys | Team::Giants | Team::Eagles | Team::Commanders => (Nfc, East),
            Team::Bears | Team::Lions | Team::Packers | Team::Vikings => (Nfc, North),
            Team::Falcons | Team::Panthers | Team::Saints | Team::Buccaneers => (Nfc, South),
            Team::Cardinals | Team::Rams | Team::Seahawks | Team::FortyNiners => (Nfc, West),
        };
        Division { conference, region }
    }

    /// Resolve an abbreviation or nickname, case-insensitively.
    ///
    /// `"KC"`, `"kc"`, `" Chiefs "` and `"chiefs"` all resolve to
    /// `Team::Chiefs`. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        ALL_TEAMS
            .iter()
            .copied()
            .find(|t| t.abbr() == needle || t.nickname().to_lowercase() == needle)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nickname())
    }
}

/// Whether two team identifiers belong to the same division.
///
/// Identifiers that don't resolve to a known franchise never form a
/// division game.
pub fn is_division_game(a: &str, b: &str) -> bool {
    match (Team::parse(a), Team::parse(b)) {
        (Some(x), Some(y)) => x != y && x.division() == y.division(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
