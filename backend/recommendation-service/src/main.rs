use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recommendation_service::handlers::{self, RecommendationHandlerState};
use recommendation_service::models::RecsKind;
use recommendation_service::services::events::client_for_url;
use recommendation_service::services::HttpSimilarityClient;
use recommendation_service::{
    Config, OnlineRanker, RecommendationPipeline, RecommendationStore, SimilaritySource,
    SimilarityStore,
};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&config.log_format);

    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Starting {} v{}",
        config.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Snapshots: any failure here stops startup
    let similarity = Arc::new(
        SimilarityStore::load(&config.similar_items_path)
            .context("Failed to load similar items snapshot")?,
    );

    let mut recommendations = RecommendationStore::new();
    recommendations
        .load(RecsKind::Personal, &config.personal_recs_path)
        .context("Failed to load personal recommendations snapshot")?;
    recommendations
        .load(RecsKind::Default, &config.default_recs_path)
        .context("Failed to load default recommendations snapshot")?;
    recommendations
        .ensure_ready()
        .context("Recommendation store is not ready")?;
    let recommendations = Arc::new(recommendations);

    // Upstream clients
    let online_config = config.online();
    let http = reqwest::Client::builder()
        .timeout(online_config.upstream_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let events = client_for_url(&config.events_store_url, http.clone())
        .context("Failed to create event history client")?;
    info!(url = %config.events_store_url, "Event history client initialized");

    let similarity_source: Arc<dyn SimilaritySource> = match &config.similarity_service_url {
        Some(url) => {
            info!(url = %url, "Online fan-out uses remote similar items");
            Arc::new(HttpSimilarityClient::new(http.clone(), url.clone()))
        }
        None => Arc::clone(&similarity) as Arc<dyn SimilaritySource>,
    };

    let ranker = Arc::new(OnlineRanker::new(
        Arc::from(events),
        similarity_source,
        online_config,
    ));
    let pipeline = Arc::new(RecommendationPipeline::new(recommendations, ranker));

    let state = web::Data::new(RecommendationHandlerState {
        pipeline,
        similarity,
    });

    info!("Ready! HTTP server on {}:{}", config.http_host, config.http_port);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("Stopping");
    Ok(())
}

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,recommendation_service=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
