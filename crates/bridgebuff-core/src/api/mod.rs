//! Score service API: ranked listings and per-game detail.

mod client;
mod page;
mod record;

pub use client::ScoreClient;
pub use page::{Page, Ranking};
pub use record::{GameRecord, GameStats, Placement};
