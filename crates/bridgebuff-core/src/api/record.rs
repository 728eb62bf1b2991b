use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A cannon position as sent by the server: `[column, row]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement(pub u32, pub u32);

impl Placement {
    pub fn column(&self) -> u32 {
        self.0
    }

    pub fn row(&self) -> u32 {
        self.1
    }
}

/// Full detail of one game, as served by `/api/game/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    #[serde(alias = "stats")]
    pub game_stats: GameStats,
}

/// Per-game statistics.
///
/// Only the fields the analyses read are typed; everything else the server
/// sends is kept in `extra`. Typed fields are optional so one incomplete
/// record does not fail the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Group authentication sequence of the player ("gas")
    pub auth: Option<String>,
    pub sunk_ships: Option<u32>,
    pub escaped_ships: Option<u32>,
    pub cannons: Option<Vec<Placement>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
