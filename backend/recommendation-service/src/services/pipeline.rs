use crate::error::{AppError, Result};
use crate::models::{ItemId, RecStats, RecsLookup, UserId};
use crate::services::blender::combine;
use crate::services::online::OnlineRanker;
use crate::services::recommendations::RecommendationStore;
use std::sync::Arc;
use tracing::{debug, error};

/// Offline, online and blended recommendation flows over shared stores.
pub struct RecommendationPipeline {
    recommendations: Arc<RecommendationStore>,
    ranker: Arc<OnlineRanker>,
}

impl RecommendationPipeline {
    pub fn new(recommendations: Arc<RecommendationStore>, ranker: Arc<OnlineRanker>) -> Self {
        Self {
            recommendations,
            ranker,
        }
    }

    pub fn offline(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>> {
        match self.recommendations.get(user_id, k) {
            RecsLookup::Personal(recs) | RecsLookup::Default(recs) => Ok(recs),
            RecsLookup::StoreUnavailable => {
                error!(user_id, "Offline recommendations unavailable: no default list loaded");
                Err(AppError::Configuration(
                    "default recommendations not loaded".to_string(),
                ))
            }
        }
    }

    pub async fn online(&self, user_id: UserId, k: usize) -> Vec<ItemId> {
        self.ranker.recommend(user_id, k).await
    }

    /// Offline and online paths run concurrently, then get blended.
    pub async fn blended(&self, user_id: UserId, k: usize) -> Result<Vec<ItemId>> {
        let (offline, online) = tokio::join!(
            async { self.offline(user_id, k) },
            self.online(user_id, k)
        );
        let offline = offline?;

        debug!(
            user_id,
            offline = offline.len(),
            online = online.len(),
            "Blending recommendations"
        );

        Ok(combine(&offline, &online, k))
    }

    pub fn stats(&self) -> RecStats {
        self.recommendations.stats()
    }

    pub fn recommendations(&self) -> &RecommendationStore {
        &self.recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OnlineConfig;
    use crate::services::events::{EventHistoryClient, InMemoryEventHistory};
    use crate::services::similarity::SimilarityStore;
    use crate::snapshot::{DefaultRecsSnapshot, PersonalRecsSnapshot, SimilaritySnapshot};

    async fn pipeline(with_default: bool) -> RecommendationPipeline {
        let mut store = RecommendationStore::new();
        store
            .load_personal(PersonalRecsSnapshot {
                user_id: vec![1, 1, 1],
                item_id: vec![100, 101, 102],
                rank: vec![1, 2, 3],
            })
            .unwrap();
        if with_default {
            store
                .load_default(DefaultRecsSnapshot {
                    item_id: vec![500, 501],
                    rank: vec![1, 2],
                })
                .unwrap();
        }

        let similarity = SimilarityStore::from_snapshot(SimilaritySnapshot {
            item_id_1: vec![7, 7],
            item_id_2: vec![900, 101],
            score: vec![0.9, 0.8],
        })
        .unwrap();

        let events = InMemoryEventHistory::default();
        events.record_event(1, 7).await.unwrap();

        let ranker = OnlineRanker::new(
            Arc::new(events),
            Arc::new(similarity),
            OnlineConfig::default(),
        );
        RecommendationPipeline::new(Arc::new(store), Arc::new(ranker))
    }

    #[tokio::test]
    async fn test_blended() {
        let pipeline = pipeline(true).await;

        // online [900, 101], offline [100, 101, 102]
        assert_eq!(pipeline.blended(1, 10).await.unwrap(), vec![900, 100, 101, 102]);
        assert_eq!(pipeline.stats().personal_hits, 1);
    }

    #[tokio::test]
    async fn test_blended_without_online_history() {
        let pipeline = pipeline(true).await;

        assert_eq!(pipeline.blended(2, 10).await.unwrap(), vec![500, 501]);
        assert_eq!(pipeline.stats().default_hits, 1);
    }

    #[tokio::test]
    async fn test_missing_default_fails_fast() {
        let pipeline = pipeline(false).await;

        assert!(matches!(
            pipeline.offline(2, 10),
            Err(AppError::Configuration(_))
        ));
        assert!(pipeline.blended(2, 10).await.is_err());
    }
}
