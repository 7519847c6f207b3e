use serde::{Deserialize, Serialize};

pub type ItemId = i64;
pub type UserId = i64;

/// Response of a similarity query: two parallel columns, descending by score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarItems {
    pub item_id_2: Vec<ItemId>,
    pub score: Vec<f64>,
}

impl SimilarItems {
    pub fn len(&self) -> usize {
        self.item_id_2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_id_2.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (ItemId, f64)> + '_ {
        self.item_id_2.iter().copied().zip(self.score.iter().copied())
    }
}

impl FromIterator<(ItemId, f64)> for SimilarItems {
    fn from_iter<I: IntoIterator<Item = (ItemId, f64)>>(iter: I) -> Self {
        let (item_id_2, score) = iter.into_iter().unzip();
        Self { item_id_2, score }
    }
}

/// A similarity candidate produced by expanding one recent event.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub item_id: ItemId,
    pub score: f64,
    pub source_item: ItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecsKind {
    Personal,
    Default,
}

impl RecsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecsKind::Personal => "personal",
            RecsKind::Default => "default",
        }
    }
}

/// Outcome of an offline lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RecsLookup {
    Personal(Vec<ItemId>),
    Default(Vec<ItemId>),
    /// Neither a personal list for the user nor a default list is loaded.
    StoreUnavailable,
}

impl RecsLookup {
    pub fn kind(&self) -> Option<RecsKind> {
        match self {
            RecsLookup::Personal(_) => Some(RecsKind::Personal),
            RecsLookup::Default(_) => Some(RecsKind::Default),
            RecsLookup::StoreUnavailable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecStats {
    pub personal_hits: u64,
    pub default_hits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecsResponse {
    pub recs: Vec<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_items_pairs() {
        let items: SimilarItems = vec![(200, 0.9), (201, 0.5)].into_iter().collect();

        assert_eq!(items.item_id_2, vec![200, 201]);
        assert_eq!(items.score, vec![0.9, 0.5]);
        assert_eq!(items.pairs().collect::<Vec<_>>(), vec![(200, 0.9), (201, 0.5)]);
    }

    #[test]
    fn test_empty_similar_items_serialize_as_lists() {
        let json = serde_json::to_value(SimilarItems::default()).unwrap();
        assert_eq!(json, serde_json::json!({"item_id_2": [], "score": []}));
    }

    #[test]
    fn test_lookup_kind() {
        assert_eq!(RecsLookup::Personal(vec![1]).kind(), Some(RecsKind::Personal));
        assert_eq!(RecsLookup::Default(vec![]).kind(), Some(RecsKind::Default));
        assert_eq!(RecsLookup::StoreUnavailable.kind(), None);
    }
}
