//! Optional timeouts around async operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{BinRpcError, Result};

/// Await `fut`, bounded by `limit` when one is set
pub async fn with_timeout_opt<F, T>(limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| BinRpcError::Timeout)?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_elapsed_limit_is_timeout() {
        let result: Result<()> = with_timeout_opt(Some(Duration::from_millis(10)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(BinRpcError::Timeout)));
    }

    #[tokio::test]
    async fn test_no_limit_passes_result_through() {
        let result = with_timeout_opt(None, async { Ok::<_, BinRpcError>(7) }).await;
        assert!(matches!(result, Ok(7)));
    }
}
