//! HTTP page fetcher - plain GET with a size cap
//!
//! This implementation:
//! - Uses reqwest with the default redirect policy
//! - Treats 200 as success, 404 as `PageNotFound`, anything else as unavailable
//! - Streams the body and stops once it grows past `max_page_bytes`
//!
//! Limitations:
//! - No JavaScript rendering and no HTML-to-text conversion; the model sees
//!   the raw body
//! - No retries

use std::time::{Duration, Instant};

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::BasePageFetcher;
use crate::common::with_cancel;
use crate::error::{ExtractionError, Result};

/// Default cap on the page body.
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Fetches page bodies over HTTP.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_page_bytes: usize,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, max_page_bytes: usize) -> AnyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lead-extraction/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_page_bytes,
        })
    }

    pub fn max_page_bytes(&self) -> usize {
        self.max_page_bytes
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let start = Instant::now();

        let mut response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                return ExtractionError::invalid_argument(format!("invalid url {url:?}"));
            }
            warn!(url = %url, error = %e, "Page request failed");
            ExtractionError::ServiceUnavailable(e.to_string())
        })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(ExtractionError::PageNotFound),
            status => {
                warn!(url = %url, status = %status, "Unexpected page status");
                return Err(ExtractionError::ServiceUnavailable(format!(
                    "unexpected status {status}"
                )));
            }
        }

        let limit = self.max_page_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(ExtractionError::PageTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ExtractionError::ServiceUnavailable(e.to_string()))?
        {
            if body.len() + chunk.len() > limit {
                return Err(ExtractionError::PageTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(
            url = %url,
            bytes = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl BasePageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        with_cancel(cancel, self.fetch_page(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Router};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher(max_page_bytes: usize) -> HttpPageFetcher {
        HttpPageFetcher::new(Duration::from_secs(5), max_page_bytes).unwrap()
    }

    fn test_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "<html>Acme Corp</html>" }))
            .route("/missing", get(|| async { (AxumStatus::NOT_FOUND, "nope") }))
            .route(
                "/down",
                get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "busy") }),
            )
            .route("/big", get(|| async { "x".repeat(4096) }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    "late"
                }),
            )
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let base = serve(test_router()).await;
        let body = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch(&format!("{base}/ok"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(body, "<html>Acme Corp</html>");
    }

    #[tokio::test]
    async fn test_404_is_page_not_found() {
        let base = serve(test_router()).await;
        let err = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch(&format!("{base}/missing"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::PageNotFound));
    }

    #[tokio::test]
    async fn test_other_status_is_unavailable() {
        let base = serve(test_router()).await;
        let err = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch(&format!("{base}/down"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch(&format!("http://{addr}/"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let base = serve(test_router()).await;
        let err = fetcher(1024)
            .fetch(&format!("{base}/big"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::PageTooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let err = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch("not a url", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_cancel_aborts_fetch() {
        let base = serve(test_router()).await;
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = fetcher(DEFAULT_MAX_PAGE_BYTES)
            .fetch(&format!("{base}/slow"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Cancelled));
    }
}
