use crate::config::OnlineConfig;
use crate::metrics;
use crate::models::{Candidate, ItemId, UserId};
use crate::services::events::EventHistoryClient;
use crate::services::similarity::SimilaritySource;
use crate::utils::with_timeout;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Online recommendations from the user's latest events.
///
/// Algorithm:
/// 1. Fetch the user's most recent events (best effort)
/// 2. Expand each event item into its top similar items, concurrently
/// 3. Sort all candidates by similarity score, descending (stable)
/// 4. Drop repeated items, keeping the first occurrence
///
/// Scores are used as-is: candidates from older events are not down-weighted.
pub struct OnlineRanker {
    events: Arc<dyn EventHistoryClient>,
    similarity: Arc<dyn SimilaritySource>,
    config: OnlineConfig,
}

impl OnlineRanker {
    pub fn new(
        events: Arc<dyn EventHistoryClient>,
        similarity: Arc<dyn SimilaritySource>,
        config: OnlineConfig,
    ) -> Self {
        Self {
            events,
            similarity,
            config,
        }
    }

    pub async fn recommend(&self, user_id: UserId, k: usize) -> Vec<ItemId> {
        let events = self
            .fetch_recent_events(user_id, self.config.recent_events)
            .await;
        if events.is_empty() {
            debug!(user_id, "No recent events, online recommendations are empty");
            return Vec::new();
        }

        let candidates = self
            .expand_candidates(&events, self.config.similar_per_event)
            .await;
        let candidate_count = candidates.len();

        let ranked: Vec<ItemId> = rank_candidates(candidates)
            .into_iter()
            .map(|candidate| candidate.item_id)
            .collect();
        let mut recs = dedup_preserve_order(ranked);
        recs.truncate(k);

        info!(
            user_id,
            events = events.len(),
            candidates = candidate_count,
            recs = recs.len(),
            "Online recommendations computed"
        );

        recs
    }

    /// Most recent `n` event items; an unavailable history reads as empty.
    pub async fn fetch_recent_events(&self, user_id: UserId, n: usize) -> Vec<ItemId> {
        match with_timeout(
            self.config.upstream_timeout,
            self.events.recent_events(user_id, n),
        )
        .await
        {
            Ok(events) => events,
            Err(e) => {
                metrics::EVENT_HISTORY_FAILURES_TOTAL.inc();
                warn!(user_id, error = %e, "Event history unavailable, skipping online signal");
                Vec::new()
            }
        }
    }

    /// Similar items for every event, concatenated in event order.
    ///
    /// Lookups run concurrently; a failed or slow lookup contributes nothing
    /// and does not affect the others.
    pub async fn expand_candidates(
        &self,
        event_item_ids: &[ItemId],
        k_per_item: usize,
    ) -> Vec<Candidate> {
        let lookups = event_item_ids.iter().map(|&source_item| async move {
            let result = with_timeout(
                self.config.upstream_timeout,
                self.similarity.similar(source_item, k_per_item),
            )
            .await;
            (source_item, result)
        });

        let mut candidates = Vec::new();
        for (source_item, result) in join_all(lookups).await {
            match result {
                Ok(similar) => candidates.extend(similar.pairs().map(|(item_id, score)| {
                    Candidate {
                        item_id,
                        score,
                        source_item,
                    }
                })),
                Err(e) => {
                    metrics::SIMILARITY_LOOKUP_FAILURES_TOTAL.inc();
                    warn!(item_id = source_item, error = %e, "Similar items lookup failed");
                }
            }
        }

        candidates
    }
}

/// Sort by score, highest first; ties keep accumulation order.
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Remove repeated ids, keeping the first occurrence of each.
pub fn dedup_preserve_order(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
