// AI implementation using the OpenAI chat completions API
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use async_trait::async_trait;
use openai_client::{ChatCompletion, ChatRequest, OpenAIClient};
use tokio_util::sync::CancellationToken;

use super::BaseAI;
use crate::common::with_cancel;
use crate::error::{ExtractionError, Result};

/// Wrapper around OpenAIClient that implements the BaseAI trait
#[derive(Clone, Debug)]
pub struct OpenAIAdapter(pub OpenAIClient);

impl OpenAIAdapter {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self(OpenAIClient::new(api_key).with_base_url(base_url))
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletion> {
        with_cancel(cancel, async {
            self.0
                .chat_completion(request)
                .await
                .map_err(ExtractionError::from)
        })
        .await
    }
}
