use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Ranked listings exposed under `/api/rank/<ranking>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Ranking {
    /// Games ordered by number of ships sunk
    Sunk,
    /// Games ordered by number of ships that escaped
    Escaped,
}

impl Ranking {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One slice of a ranked listing.
///
/// An empty `games` list marks the end of the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub ranking: Option<String>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub start: u32,
    pub games: Vec<u64>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.games.is_empty()
    }
}
