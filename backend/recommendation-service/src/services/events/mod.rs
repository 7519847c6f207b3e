//! Event history collaborator.
//!
//! The recent-events store is owned by another service. This module only
//! holds the contract and the clients that speak it.
mod http_client;
mod redis_history;

use crate::error::{AppError, Result};
use crate::models::{ItemId, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::VecDeque;

pub use http_client::HttpEventHistoryClient;
pub use redis_history::RedisEventHistory;

#[async_trait]
pub trait EventHistoryClient: Send + Sync {
    /// Up to `n` most recent item ids, most recent first.
    async fn recent_events(&self, user_id: UserId, n: usize) -> Result<Vec<ItemId>>;

    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()>;
}

/// Process-local event history, bounded per user. Selected with a
/// `memory://` events URL for local runs.
pub struct InMemoryEventHistory {
    events_by_user: DashMap<UserId, VecDeque<ItemId>>,
    max_per_user: usize,
}

impl Default for InMemoryEventHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl InMemoryEventHistory {
    pub fn new(max_per_user: usize) -> Self {
        Self {
            events_by_user: DashMap::new(),
            max_per_user,
        }
    }
}

#[async_trait]
impl EventHistoryClient for InMemoryEventHistory {
    async fn recent_events(&self, user_id: UserId, n: usize) -> Result<Vec<ItemId>> {
        Ok(self
            .events_by_user
            .get(&user_id)
            .map(|events| events.iter().take(n).copied().collect())
            .unwrap_or_default())
    }

    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        let mut events = self.events_by_user.entry(user_id).or_default();
        events.push_front(item_id);
        events.truncate(self.max_per_user);
        Ok(())
    }
}

/// Build the client for `url`: `redis://` URLs read the sorted-set history
/// directly, `memory://` keeps it in process, anything else goes through the
/// HTTP events endpoint.
pub fn client_for_url(url: &str, http: reqwest::Client) -> Result<Box<dyn EventHistoryClient>> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let client = redis::Client::open(url).map_err(|e| {
            AppError::Configuration(format!("invalid event history URL {}: {}", url, e))
        })?;
        Ok(Box::new(RedisEventHistory::new(client)))
    } else if url.starts_with("memory://") {
        Ok(Box::new(InMemoryEventHistory::default()))
    } else {
        Ok(Box::new(HttpEventHistoryClient::new(http, url)))
    }
}
