//! Cancellation for outbound calls.
//!
//! Every external call (page fetch, completion, query) runs under the
//! caller's [`CancellationToken`]. When the token fires first the call is
//! dropped and [`ExtractionError::Cancelled`] is returned.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{ExtractionError, Result};

/// Run `fut` until it completes or `cancel` fires, whichever is first.
pub async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let value = with_cancel(&cancel, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let polled = std::sync::atomic::AtomicBool::new(false);
        let result = with_cancel(&cancel, async {
            polled.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ExtractionError::Cancelled)));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_slow_future() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = with_cancel(&cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ExtractionError::Cancelled)));
    }
}
