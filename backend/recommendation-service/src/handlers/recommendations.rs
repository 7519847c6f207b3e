/// Recommendation API Handlers
///
/// Parameters come from the query string (`POST /recommendations?user_id=1&k=5`).
use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{ItemId, RecsResponse, UserId};
use crate::services::{RecommendationPipeline, SimilarityStore};

/// Query parameters for the per-user endpoints
#[derive(Debug, Deserialize)]
pub struct RecsQuery {
    pub user_id: UserId,

    /// Maximum number of recommendations (default: 100)
    #[serde(default = "default_recs_k")]
    pub k: i64,
}

/// Query parameters for POST /similar_items
#[derive(Debug, Deserialize)]
pub struct SimilarItemsQuery {
    pub item_id: ItemId,

    /// Maximum number of similar items (default: 5)
    #[serde(default = "default_similar_k")]
    pub k: i64,
}

fn default_recs_k() -> i64 {
    100
}

fn default_similar_k() -> i64 {
    5
}

fn validate_k(k: i64) -> Result<usize> {
    usize::try_from(k).map_err(|_| AppError::Validation(format!("k must be >= 0, got {}", k)))
}

/// Handler state for recommendation endpoints
pub struct RecommendationHandlerState {
    pub pipeline: Arc<RecommendationPipeline>,
    pub similarity: Arc<SimilarityStore>,
}

/// POST /similar_items
/// Top-k items similar to `item_id`; empty columns for unknown items
#[post("/similar_items")]
pub async fn similar_items(
    query: web::Query<SimilarItemsQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let k = validate_k(query.k)?;
    metrics::REC_REQUESTS_TOTAL
        .with_label_values(&["similar_items"])
        .inc();

    let similar = state.similarity.get(query.item_id, k);

    Ok(HttpResponse::Ok().json(similar))
}

/// POST /recommendations_offline
/// Precomputed recommendations, default list for users without one
#[post("/recommendations_offline")]
pub async fn recommendations_offline(
    query: web::Query<RecsQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let k = validate_k(query.k)?;
    metrics::REC_REQUESTS_TOTAL
        .with_label_values(&["offline"])
        .inc();

    let recs = state.pipeline.offline(query.user_id, k)?;
    debug!(user_id = query.user_id, k, count = recs.len(), "Offline recommendations");

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// POST /recommendations_online
/// Recommendations from the user's latest events
#[post("/recommendations_online")]
pub async fn recommendations_online(
    query: web::Query<RecsQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let k = validate_k(query.k)?;
    metrics::REC_REQUESTS_TOTAL
        .with_label_values(&["online"])
        .inc();

    let recs = state.pipeline.online(query.user_id, k).await;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// POST /recommendations
/// Offline and online recommendations blended into one list
#[post("/recommendations")]
pub async fn recommendations_blended(
    query: web::Query<RecsQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let k = validate_k(query.k)?;
    metrics::REC_REQUESTS_TOTAL
        .with_label_values(&["blended"])
        .inc();

    let recs = state.pipeline.blended(query.user_id, k).await?;

    Ok(HttpResponse::Ok().json(RecsResponse { recs }))
}

/// GET /stats
/// Personal/default hit counters
#[get("/stats")]
pub async fn stats(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    HttpResponse::Ok().json(state.pipeline.stats())
}
