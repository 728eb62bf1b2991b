use serde::Serialize;

use crate::analysis::{Analysis, Bucket};
use crate::api::{GameRecord, Placement, Ranking};

/// Rows of the board where cannons can be placed.
pub const ROW_COUNT: usize = 5;

/// Digits in a placement signature; digit `i` counts rows holding `i` cannons.
pub const SIGNATURE_DIGITS: usize = 8;

/// Number of cannons in each row. Placements outside the board are ignored.
pub fn row_counts(placements: &[Placement]) -> [u32; ROW_COUNT] {
    let mut counts = [0; ROW_COUNT];
    for placement in placements {
        if let Some(count) = counts.get_mut(placement.row() as usize) {
            *count += 1;
        }
    }
    counts
}

/// Normalized placement signature, e.g. `"31100000"`.
///
/// Digit `i` is the number of rows holding exactly `i` cannons. Rows with
/// [`SIGNATURE_DIGITS`] or more cannons have no digit and are left out.
/// Only the row distribution matters, so the order of `placements` and the
/// columns used do not affect the result.
pub fn placement_signature(placements: &[Placement]) -> String {
    let mut digits = [0u32; SIGNATURE_DIGITS];
    for count in row_counts(placements) {
        if let Some(digit) = digits.get_mut(count as usize) {
            *digit += 1;
        }
    }
    digits.iter().map(u32::to_string).collect()
}

/// Average escaped ships per normalized cannon placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannonPlacement;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRow {
    pub signature: String,
    pub games: u32,
    pub average_escaped: f64,
}

impl Analysis for CannonPlacement {
    type Key = String;
    type Row = PlacementRow;

    fn ranking(&self) -> Ranking {
        Ranking::Escaped
    }

    fn observe(&self, record: &GameRecord) -> Option<(String, f64)> {
        let stats = &record.game_stats;
        let cannons = stats.cannons.as_deref()?;
        let escaped = stats.escaped_ships?;
        Some((placement_signature(cannons), f64::from(escaped)))
    }

    /// Fewest escaped ships first; equal averages keep first-seen order.
    fn summarize(&self, groups: Vec<(String, Bucket)>) -> Vec<PlacementRow> {
        let mut rows: Vec<PlacementRow> = groups
            .into_iter()
            .map(|(signature, bucket)| PlacementRow {
                signature,
                games: bucket.count,
                average_escaped: bucket.average(),
            })
            .collect();
        rows.sort_by(|a, b| a.average_escaped.total_cmp(&b.average_escaped));
        rows
    }
}
