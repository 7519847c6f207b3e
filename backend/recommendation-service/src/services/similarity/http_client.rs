use super::SimilaritySource;
use crate::error::{AppError, Result};
use crate::models::{ItemId, SimilarItems};
use async_trait::async_trait;
use tracing::debug;

/// Similarity lookups against a remote `/similar_items` endpoint.
///
/// Used when the similarity index is served by a separate instance instead of
/// the local snapshot.
pub struct HttpSimilarityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSimilarityClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SimilaritySource for HttpSimilarityClient {
    async fn similar(&self, item_id: ItemId, k: usize) -> Result<SimilarItems> {
        let similar: SimilarItems = self
            .client
            .post(format!("{}/similar_items", self.base_url))
            .query(&[("item_id", item_id.to_string()), ("k", k.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if similar.item_id_2.len() != similar.score.len() {
            return Err(AppError::UpstreamUnavailable(format!(
                "similar items for {} have {} ids but {} scores",
                item_id,
                similar.item_id_2.len(),
                similar.score.len()
            )));
        }

        debug!(item_id, count = similar.len(), "Remote similar items fetched");

        Ok(similar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_remote_similar_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/similar_items"))
            .and(query_param("item_id", "100"))
            .and(query_param("k", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "item_id_2": [200, 201],
                "score": [0.9, 0.5]
            })))
            .mount(&server)
            .await;

        let client =
            HttpSimilarityClient::new(reqwest::Client::new(), format!("{}/", server.uri()));
        let similar = client.similar(100, 2).await.unwrap();

        assert_eq!(similar.item_id_2, vec![200, 201]);
        assert_eq!(similar.score, vec![0.9, 0.5]);
    }

    #[tokio::test]
    async fn test_remote_error_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/similar_items"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpSimilarityClient::new(reqwest::Client::new(), server.uri());
        let result = client.similar(100, 5).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_ragged_response_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/similar_items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "item_id_2": [200, 201, 202],
                "score": [0.9]
            })))
            .mount(&server)
            .await;

        let client = HttpSimilarityClient::new(reqwest::Client::new(), server.uri());
        let result = client.similar(100, 3).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }
}
