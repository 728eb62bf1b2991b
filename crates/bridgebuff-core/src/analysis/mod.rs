//! Statistical reports over fetched game records.
//!
//! Both analyses follow the same pipeline:
//! 1. Collect the game ids of one ranked listing
//! 2. Fetch every game's detail, skipping games that cannot be fetched
//! 3. Drop records lacking the fields the analysis needs
//! 4. Group the rest by a derived key and average one metric per group
//! 5. Sort the groups into report rows

mod gas;
mod placement;

pub use gas::{GasPerformance, GasPerformanceRow};
pub use placement::{
    CannonPlacement, PlacementRow, ROW_COUNT, SIGNATURE_DIGITS, placement_signature, row_counts,
};

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{info, warn};

use crate::api::{GameRecord, Ranking, ScoreClient};
use crate::config::PaginationConfig;
use crate::network::Connection;

/// The reports this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    GasPerformance,
    CannonPlacement,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Human-readable report title
    pub fn title(&self) -> &'static str {
        match self {
            Self::GasPerformance => "Gas performance",
            Self::CannonPlacement => "Cannon placement",
        }
    }
}

/// Running count and sum for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub count: u32,
    pub total: f64,
}

impl Bucket {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / f64::from(self.count)
        }
    }
}

/// Buckets keyed by group, remembering the order keys were first seen.
#[derive(Debug, Clone)]
pub struct Buckets<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Bucket)>,
}

impl<K> Default for Buckets<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> Buckets<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: f64) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.entries.push((key.clone(), Bucket::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].1.add(value);
    }

    /// Groups in first-seen order
    pub fn into_entries(self) -> Vec<(K, Bucket)> {
        self.entries
    }
}

impl<K: Clone + Eq + Hash> FromIterator<(K, f64)> for Buckets<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut buckets = Self::new();
        for (key, value) in iter {
            buckets.add(key, value);
        }
        buckets
    }
}

/// One report over game records.
pub trait Analysis {
    type Key: Clone + Eq + Hash;
    type Row;

    /// Listing whose games feed this analysis.
    fn ranking(&self) -> Ranking;

    /// Grouping key and metric sample for a record, or `None` if the record
    /// lacks a field this analysis needs.
    fn observe(&self, record: &GameRecord) -> Option<(Self::Key, f64)>;

    /// Turn the groups (in first-seen order) into sorted report rows.
    fn summarize(&self, groups: Vec<(Self::Key, Bucket)>) -> Vec<Self::Row>;

    /// Aggregate already-fetched records into report rows.
    fn aggregate<'a, I>(&self, records: I) -> Vec<Self::Row>
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        self.aggregate_counted(records).0
    }

    /// Report rows plus the number of records `observe` rejected.
    fn aggregate_counted<'a, I>(&self, records: I) -> (Vec<Self::Row>, usize)
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let mut buckets = Buckets::new();
        let mut incomplete = 0;
        for record in records {
            match self.observe(record) {
                Some((key, value)) => buckets.add(key, value),
                None => incomplete += 1,
            }
        }
        (self.summarize(buckets.into_entries()), incomplete)
    }
}

/// Report rows plus how many games made it through each stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport<R> {
    pub rows: Vec<R>,
    /// Games listed by the ranking
    pub listed: usize,
    /// Games whose detail was fetched
    pub fetched: usize,
    /// Games whose detail could not be fetched
    pub failed: usize,
    /// Fetched games lacking a field the analysis needs
    pub incomplete: usize,
}

/// Run an analysis end to end against the score service.
///
/// A game whose detail cannot be fetched is logged and skipped; it never
/// aborts the run. If the connection is lost, the remaining games are counted
/// as failed without being requested. If the listing itself is unreachable
/// the report is empty.
pub fn run_analysis<A, C>(
    client: &mut ScoreClient<C>,
    analysis: &A,
    pagination: &PaginationConfig,
) -> AnalysisReport<A::Row>
where
    A: Analysis,
    C: Connection,
{
    let ids = client.collect(analysis.ranking(), pagination);

    let mut records = Vec::with_capacity(ids.len());
    let mut failed = 0;
    for (index, &id) in ids.iter().enumerate() {
        if client.transport().is_broken() {
            let remaining = ids.len() - index;
            warn!("Connection lost; skipping the remaining {} games", remaining);
            failed += remaining;
            break;
        }
        match client.fetch_detail(id) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping game {}: {}", id, e);
                failed += 1;
            }
        }
    }

    let (rows, incomplete) = analysis.aggregate_counted(&records);
    if incomplete > 0 {
        warn!("{} games lacked the fields needed for this analysis", incomplete);
    }

    info!(
        "{} ranking: {} listed, {} fetched, {} failed, {} incomplete, {} groups",
        analysis.ranking(),
        ids.len(),
        records.len(),
        failed,
        incomplete,
        rows.len()
    );

    AnalysisReport {
        rows,
        listed: ids.len(),
        fetched: records.len(),
        failed,
        incomplete,
    }
}

/// Average sunk ships per gas, most active gas first.
pub fn analyze_gas_performance<C: Connection>(
    client: &mut ScoreClient<C>,
    pagination: &PaginationConfig,
) -> AnalysisReport<GasPerformanceRow> {
    run_analysis(client, &GasPerformance, pagination)
}

/// Average escaped ships per normalized cannon placement, best placement first.
pub fn analyze_cannon_placements<C: Connection>(
    client: &mut ScoreClient<C>,
    pagination: &PaginationConfig,
) -> AnalysisReport<PlacementRow> {
    run_analysis(client, &CannonPlacement, pagination)
}
