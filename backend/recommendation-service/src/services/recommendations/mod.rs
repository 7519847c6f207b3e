use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{ItemId, RecStats, RecsKind, RecsLookup, UserId};
use crate::snapshot::{read_snapshot, DefaultRecsSnapshot, PersonalRecsSnapshot, Snapshot};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, warn};

/// Offline recommendations: per-user lists plus a default (top popular) list.
///
/// Loaded once at startup through `&mut self`, then shared read-only behind an
/// `Arc`. The hit counters are the only state mutated while serving.
#[derive(Debug, Default)]
pub struct RecommendationStore {
    personal: Option<HashMap<UserId, Vec<ItemId>>>,
    default: Option<Vec<ItemId>>,
    personal_hits: AtomicU64,
    default_hits: AtomicU64,
}

impl RecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, kind: RecsKind, path: impl AsRef<Path>) -> Result<()> {
        info!(kind = kind.as_str(), path = %path.as_ref().display(), "Loading recommendations");

        match kind {
            RecsKind::Personal => self.load_personal(read_snapshot(path)?)?,
            RecsKind::Default => self.load_default(read_snapshot(path)?)?,
        }

        info!(kind = kind.as_str(), "Recommendations loaded");
        Ok(())
    }

    pub fn load_personal(&mut self, snapshot: PersonalRecsSnapshot) -> Result<()> {
        snapshot.validate()?;

        let mut ranked: HashMap<UserId, Vec<(i64, ItemId)>> = HashMap::new();
        for ((user_id, item_id), rank) in snapshot
            .user_id
            .into_iter()
            .zip(snapshot.item_id)
            .zip(snapshot.rank)
        {
            ranked.entry(user_id).or_default().push((rank, item_id));
        }

        let personal: HashMap<UserId, Vec<ItemId>> = ranked
            .into_iter()
            .map(|(user_id, items)| (user_id, by_rank(items)))
            .collect();

        info!(users = personal.len(), "Personal recommendations indexed");
        self.personal = Some(personal);
        Ok(())
    }

    pub fn load_default(&mut self, snapshot: DefaultRecsSnapshot) -> Result<()> {
        snapshot.validate()?;

        let default = by_rank(snapshot.rank.into_iter().zip(snapshot.item_id).collect());
        if default.is_empty() {
            return Err(AppError::Configuration(
                "default recommendations snapshot is empty".to_string(),
            ));
        }

        info!(items = default.len(), "Default recommendations indexed");
        self.default = Some(default);
        Ok(())
    }

    /// Startup check: both personal and default lists must be present.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.personal.is_none() {
            return Err(AppError::Configuration(
                "personal recommendations not loaded".to_string(),
            ));
        }
        if self.default.is_none() {
            return Err(AppError::Configuration(
                "default recommendations not loaded".to_string(),
            ));
        }
        Ok(())
    }

    /// First k recommendations for the user, falling back to the default list.
    pub fn get(&self, user_id: UserId, k: usize) -> RecsLookup {
        let personal = self
            .personal
            .as_ref()
            .and_then(|personal| personal.get(&user_id));

        let lookup = match (personal, &self.default) {
            (Some(recs), _) => {
                self.personal_hits.fetch_add(1, Ordering::Relaxed);
                RecsLookup::Personal(recs.iter().take(k).copied().collect())
            }
            (None, Some(default)) => {
                self.default_hits.fetch_add(1, Ordering::Relaxed);
                warn!(user_id, "No personal recommendations, serving default list");
                RecsLookup::Default(default.iter().take(k).copied().collect())
            }
            (None, None) => {
                error!(user_id, "No recommendations found: default list is not loaded");
                RecsLookup::StoreUnavailable
            }
        };

        if let Some(kind) = lookup.kind() {
            metrics::OFFLINE_LOOKUPS_TOTAL
                .with_label_values(&[kind.as_str()])
                .inc();
        }

        lookup
    }

    pub fn stats(&self) -> RecStats {
        let stats = RecStats {
            personal_hits: self.personal_hits.load(Ordering::Relaxed),
            default_hits: self.default_hits.load(Ordering::Relaxed),
        };

        info!(
            personal_hits = stats.personal_hits,
            default_hits = stats.default_hits,
            "Stats for recommendations"
        );

        stats
    }

    pub fn personal_users(&self) -> usize {
        self.personal.as_ref().map(HashMap::len).unwrap_or(0)
    }

    pub fn default_len(&self) -> usize {
        self.default.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Order by ascending rank; equal ranks keep snapshot order.
fn by_rank(mut items: Vec<(i64, ItemId)>) -> Vec<ItemId> {
    items.sort_by_key(|(rank, _)| *rank);
    items.into_iter().map(|(_, item_id)| item_id).collect()
}
