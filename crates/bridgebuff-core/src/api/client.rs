use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::{GameRecord, Page, Ranking};
use crate::config::endpoints::{GAME_PATH, RANK_PATH};
use crate::config::pagination::MAX_PAGE_SIZE;
use crate::config::{PaginationConfig, TransportConfig};
use crate::error::Result;
use crate::network::{Connection, Request, Transport};

/// Client for the score service over a single connection.
///
/// All calls go through one [`Transport`], so they are issued strictly one
/// after another. Retrying is the transport's job; nothing here retries.
pub struct ScoreClient<C: Connection> {
    transport: Transport<C>,
    host: String,
}

impl<C: Connection> ScoreClient<C> {
    pub fn new(connection: C, host: impl Into<String>, config: TransportConfig) -> Self {
        Self {
            transport: Transport::new(connection, config),
            host: host.into(),
        }
    }

    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    fn get_json<T: DeserializeOwned>(&mut self, request: Request) -> Result<T> {
        let response = self.transport.exchange(&request)?;
        response.json()
    }

    /// Fetch one page of a ranked listing.
    pub fn fetch_page(&mut self, ranking: Ranking, limit: u32, start: u64) -> Result<Page> {
        let request = Request::get(&self.host, format!("{}/{}", RANK_PATH, ranking))
            .param("limit", limit)
            .param("start", start);
        self.get_json(request)
    }

    /// Fetch the full detail of one game.
    pub fn fetch_detail(&mut self, id: u64) -> Result<GameRecord> {
        let request = Request::get(&self.host, format!("{}/{}", GAME_PATH, id));
        self.get_json(request)
    }

    /// Walk a ranked listing from the beginning and return every game id.
    ///
    /// Stops at the first empty page, once `start` would pass
    /// `pagination.hard_cap`, or at the first page that could not be
    /// fetched. In the last case the ids gathered so far are returned. Ids
    /// already seen are not appended again.
    pub fn collect(&mut self, ranking: Ranking, pagination: &PaginationConfig) -> Vec<u64> {
        let hard_cap = u64::from(pagination.hard_cap);
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut start: u64 = 0;
        let mut round: u32 = 0;

        while start <= hard_cap {
            let limit = pagination.limit_for_round(round).clamp(1, MAX_PAGE_SIZE);

            let page = match self.fetch_page(ranking, limit, start) {
                Ok(page) => page,
                Err(e) => {
                    if ids.is_empty() {
                        warn!("No {} ranking available: {}", ranking, e);
                    } else {
                        warn!(
                            "Stopping {} ranking at start={} after {} games: {}",
                            ranking,
                            start,
                            ids.len(),
                            e
                        );
                    }
                    break;
                }
            };

            if page.is_last() {
                debug!("{} ranking ended at start={}", ranking, start);
                break;
            }

            let received = page.games.len();
            let mut duplicates = 0;
            for id in page.games {
                if seen.insert(id) {
                    ids.push(id);
                } else {
                    duplicates += 1;
                }
            }
            if duplicates > 0 {
                debug!(
                    "{} ranking page at start={} repeated {} games",
                    ranking, start, duplicates
                );
            }
            debug!(
                "{} ranking: {} games at start={} (limit {}), {} total",
                ranking,
                received,
                start,
                limit,
                ids.len()
            );

            start += u64::from(limit);
            round += 1;
        }

        if start > hard_cap {
            debug!("{} ranking reached hard cap {}", ranking, hard_cap);
        }
        info!("Collected {} games from {} ranking", ids.len(), ranking);
        ids
    }
}
