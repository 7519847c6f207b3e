use crate::models::ItemId;
use crate::services::online::dedup_preserve_order;

/// Blend Layer - merges offline and online recommendations.
///
/// Alternates one online item then one offline item while both lists have
/// items left, appends the rest of the longer list, drops repeats (first
/// occurrence wins, so online wins within a pair) and keeps the first `k`.
/// Unweighted on purpose; a learned blender would replace this.
pub fn combine(offline: &[ItemId], online: &[ItemId], k: usize) -> Vec<ItemId> {
    let pairs = offline.len().min(online.len());
    let mut blended = Vec::with_capacity(offline.len() + online.len());

    for (online_item, offline_item) in online.iter().zip(offline.iter()) {
        blended.push(*online_item);
        blended.push(*offline_item);
    }

    // at most one of these tails is non-empty
    blended.extend_from_slice(&online[pairs..]);
    blended.extend_from_slice(&offline[pairs..]);

    let mut blended = dedup_preserve_order(blended);
    blended.truncate(k);
    blended
}
