use crate::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Run a fallible upstream call under a per-call deadline. No retry.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::UpstreamUnavailable(format!(
            "timed out after {:?}",
            duration
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_elapsed() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(42)
        })
        .await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<i32> = with_timeout(Duration::from_secs(1), async {
            Err(AppError::Internal("boom".into()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
