pub mod health;
pub mod recommendations;

use actix_web::web;

// Re-export handlers for convenience
pub use health::{health_check, metrics_handler, readiness_check};
pub use recommendations::{
    recommendations_blended, recommendations_offline, recommendations_online, similar_items, stats,
    RecommendationHandlerState, RecsQuery, SimilarItemsQuery,
};

/// Register every route; the caller provides `web::Data<RecommendationHandlerState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(readiness_check)
        .service(metrics_handler)
        .service(similar_items)
        .service(recommendations_offline)
        .service(recommendations_online)
        .service(recommendations_blended)
        .service(stats);
}
