pub mod blender;
pub mod events;
pub mod online;
pub mod pipeline;
pub mod recommendations;
pub mod similarity;

pub use blender::combine;
pub use events::{
    EventHistoryClient, HttpEventHistoryClient, InMemoryEventHistory, RedisEventHistory,
};
pub use online::{dedup_preserve_order, rank_candidates, OnlineRanker};
pub use pipeline::RecommendationPipeline;
pub use recommendations::RecommendationStore;
pub use similarity::{HttpSimilarityClient, SimilaritySource, SimilarityStore};
