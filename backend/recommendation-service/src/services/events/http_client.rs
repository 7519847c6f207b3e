use super::EventHistoryClient;
use crate::error::Result;
use crate::models::{ItemId, UserId};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Vec<ItemId>,
}

/// Client for the events store HTTP API (`/get`, `/put`).
pub struct HttpEventHistoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEventHistoryClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EventHistoryClient for HttpEventHistoryClient {
    async fn recent_events(&self, user_id: UserId, n: usize) -> Result<Vec<ItemId>> {
        let response: EventsResponse = self
            .client
            .post(format!("{}/get", self.base_url))
            .query(&[("user_id", user_id.to_string()), ("k", n.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.events)
    }

    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        self.client
            .post(format!("{}/put", self.base_url))
            .query(&[
                ("user_id", user_id.to_string()),
                ("item_id", item_id.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_recent_events() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get"))
            .and(query_param("user_id", "1374582"))
            .and(query_param("k", "3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"events": [673041, 30964988, 41779891]})),
            )
            .mount(&server)
            .await;

        let client = HttpEventHistoryClient::new(reqwest::Client::new(), server.uri());
        let events = client.recent_events(1374582, 3).await.unwrap();

        assert_eq!(events, vec![673041, 30964988, 41779891]);
    }

    #[tokio::test]
    async fn test_record_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/put"))
            .and(query_param("user_id", "1"))
            .and(query_param("item_id", "99262"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpEventHistoryClient::new(reqwest::Client::new(), server.uri());
        client.record_event(1, 99262).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let client = HttpEventHistoryClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let result = client.recent_events(1, 3).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }
}
