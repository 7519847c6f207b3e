mod http_client;

use crate::error::Result;
use crate::models::{ItemId, SimilarItems};
use crate::snapshot::{read_snapshot, SimilaritySnapshot, Snapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub use http_client::HttpSimilarityClient;

/// Anything that can answer "which items are similar to this one".
#[async_trait]
pub trait SimilaritySource: Send + Sync {
    async fn similar(&self, item_id: ItemId, k: usize) -> Result<SimilarItems>;
}

/// Item-to-item similarity index (i2i)
///
/// Built once from the `(item_id_1, item_id_2, score)` snapshot and read-only
/// afterwards. Each list is ordered by descending score; rows with equal
/// scores keep their snapshot order.
#[derive(Debug, Default)]
pub struct SimilarityStore {
    index: HashMap<ItemId, Vec<(ItemId, f64)>>,
}

impl SimilarityStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        info!(path = %path.as_ref().display(), "Loading similar items");
        let snapshot: SimilaritySnapshot = read_snapshot(path)?;
        let store = Self::from_snapshot(snapshot)?;
        info!(items = store.len(), "Similar items loaded");
        Ok(store)
    }

    pub fn from_snapshot(snapshot: SimilaritySnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut index: HashMap<ItemId, Vec<(ItemId, f64)>> = HashMap::new();
        for ((source, similar), score) in snapshot
            .item_id_1
            .into_iter()
            .zip(snapshot.item_id_2)
            .zip(snapshot.score)
        {
            index.entry(source).or_default().push((similar, score));
        }

        for similar in index.values_mut() {
            // stable: equal scores keep snapshot order
            similar.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        Ok(Self { index })
    }

    /// Top-k similar items for `item_id`. Unknown items yield empty columns.
    pub fn get(&self, item_id: ItemId, k: usize) -> SimilarItems {
        match self.index.get(&item_id) {
            Some(similar) => similar.iter().take(k).copied().collect(),
            None => {
                warn!(item_id, "No similar items found for item");
                SimilarItems::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[async_trait]
impl SimilaritySource for SimilarityStore {
    async fn similar(&self, item_id: ItemId, k: usize) -> Result<SimilarItems> {
        Ok(self.get(item_id, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SimilarityStore {
        SimilarityStore::from_snapshot(SimilaritySnapshot {
            item_id_1: vec![100, 100, 300, 300, 300],
            item_id_2: vec![201, 200, 301, 302, 303],
            score: vec![0.5, 0.9, 0.4, 0.7, 0.4],
        })
        .unwrap()
    }

    #[test]
    fn test_get_top_k() {
        let store = store();

        let top = store.get(100, 1);
        assert_eq!(top.item_id_2, vec![200]);
        assert_eq!(top.score, vec![0.9]);
    }

    #[test]
    fn test_get_sorted_descending() {
        let store = store();

        let all = store.get(300, 10);
        assert_eq!(all.item_id_2, vec![302, 301, 303]);
        assert!(all.score.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_unknown_item_is_empty() {
        let store = store();

        let missing = store.get(999, 5);
        assert!(missing.item_id_2.is_empty());
        assert!(missing.score.is_empty());
    }

    #[test]
    fn test_k_zero() {
        assert!(store().get(100, 0).is_empty());
    }

    #[test]
    fn test_len() {
        assert_eq!(store().len(), 2);
        assert!(SimilarityStore::default().is_empty());
    }

    #[tokio::test]
    async fn test_similarity_source() {
        let store = store();
        let similar = store.similar(100, 5).await.unwrap();
        assert_eq!(similar.item_id_2, vec![200, 201]);
    }
}
