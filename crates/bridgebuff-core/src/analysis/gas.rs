use serde::Serialize;

use crate::analysis::{Analysis, Bucket};
use crate::api::{GameRecord, Ranking};

/// Average sunk ships per gas (player authentication sequence).
#[derive(Debug, Clone, Copy, Default)]
pub struct GasPerformance;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasPerformanceRow {
    pub gas: String,
    pub games: u32,
    pub average_sunk: f64,
}

impl Analysis for GasPerformance {
    type Key = String;
    type Row = GasPerformanceRow;

    fn ranking(&self) -> Ranking {
        Ranking::Sunk
    }

    fn observe(&self, record: &GameRecord) -> Option<(String, f64)> {
        let stats = &record.game_stats;
        let gas = stats.auth.clone()?;
        let sunk = stats.sunk_ships?;
        Some((gas, f64::from(sunk)))
    }

    /// Most games first; gases with equal game counts keep first-seen order.
    fn summarize(&self, groups: Vec<(String, Bucket)>) -> Vec<GasPerformanceRow> {
        let mut rows: Vec<GasPerformanceRow> = groups
            .into_iter()
            .map(|(gas, bucket)| GasPerformanceRow {
                gas,
                games: bucket.count,
                average_sunk: bucket.average(),
            })
            .collect();
        rows.sort_by(|a, b| b.games.cmp(&a.games));
        rows
    }
}
