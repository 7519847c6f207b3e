use super::EventHistoryClient;
use crate::error::Result;
use crate::models::{ItemId, UserId};
use async_trait::async_trait;
use redis::AsyncCommands;

/// `user:recent_items:{user_id}` -> Sorted Set of item ids (score = event time in ms)
const USER_RECENT_ITEMS_KEY: &str = "user:recent_items:";

/// Events kept per user; older entries are trimmed on write.
const MAX_EVENTS_PER_USER: isize = 50;

/// Event history read straight from the events store's Redis sorted sets.
pub struct RedisEventHistory {
    redis_client: redis::Client,
}

impl RedisEventHistory {
    pub fn new(redis_client: redis::Client) -> Self {
        Self { redis_client }
    }
}

fn recent_items_key(user_id: UserId) -> String {
    format!("{}{}", USER_RECENT_ITEMS_KEY, user_id)
}

#[async_trait]
impl EventHistoryClient for RedisEventHistory {
    async fn recent_events(&self, user_id: UserId, n: usize) -> Result<Vec<ItemId>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let items: Vec<ItemId> = conn
            .zrevrange(recent_items_key(user_id), 0, n as isize - 1)
            .await?;

        Ok(items)
    }

    async fn record_event(&self, user_id: UserId, item_id: ItemId) -> Result<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let key = recent_items_key(user_id);

        let _: () = conn
            .zadd(&key, item_id, chrono::Utc::now().timestamp_millis())
            .await?;
        // keep only the newest MAX_EVENTS_PER_USER members
        let _: () = conn
            .zremrangebyrank(&key, 0, -(MAX_EVENTS_PER_USER + 1))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(recent_items_key(1374582), "user:recent_items:1374582");
    }

    #[tokio::test]
    async fn test_zero_events_skips_redis() {
        let client = redis::Client::open("redis://127.0.0.1:1").expect("Redis client failed");
        let history = RedisEventHistory::new(client);

        assert!(history.recent_events(1, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_events_against_redis() {
        let client = redis::Client::open("redis://localhost:6379").expect("Redis client failed");
        let history = RedisEventHistory::new(client);

        match history.record_event(424242, 99262).await {
            Ok(()) => {
                let events = history.recent_events(424242, 3).await.unwrap();
                assert_eq!(events.first(), Some(&99262));
            }
            Err(_) => {
                println!("Redis not available, skipping test");
            }
        }
    }
}
