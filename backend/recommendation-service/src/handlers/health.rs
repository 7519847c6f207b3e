use actix_web::{get, web, HttpResponse};

use super::RecommendationHandlerState;
use crate::error::{AppError, Result};
use crate::metrics;

const SERVICE_NAME: &str = "recommendation-service";

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME
    }))
}

/// Stores are loaded before the server binds, so this mostly reports sizes.
#[get("/ready")]
pub async fn readiness_check(state: web::Data<RecommendationHandlerState>) -> Result<HttpResponse> {
    let recommendations = state.pipeline.recommendations();
    recommendations.ensure_ready()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ready",
        "service": SERVICE_NAME,
        "similar_items": state.similarity.len(),
        "personal_users": recommendations.personal_users(),
        "default_items": recommendations.default_len()
    })))
}

#[get("/metrics")]
pub async fn metrics_handler() -> Result<HttpResponse> {
    let body = metrics::render().map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
