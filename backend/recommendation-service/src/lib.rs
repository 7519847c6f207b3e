pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod snapshot;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{
    OnlineRanker, RecommendationPipeline, RecommendationStore, SimilaritySource, SimilarityStore,
};
