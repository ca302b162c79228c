//! Entity extraction over page text.
//!
//! One completion per page: the prompt frames the task as B2B lead
//! generation, the page text follows verbatim, and the response is
//! constrained by the strict [`SchemaDescriptor`].

use std::sync::Arc;

use openai_client::{ChatCompletion, ChatRequest, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::models::ExtractedEntities;
use super::schema::SchemaDescriptor;
use crate::error::{ExtractionError, Result};
use crate::kernel::BaseAI;

/// Model snapshot that supports strict structured outputs.
pub const EXTRACTION_MODEL: &str = "gpt-4o-2024-08-06";

const EXTRACTION_PROMPT: &str = "\
You're looking for B2B data to help with lead generation for a CRM tool. \
Extract companies and people from the following webpage content.
Be extra careful when extracting data and prefer to discard info if you have \
any doubt that it's matching the expected format.

Webpage:
";

/// Build the user prompt for `page_text`.
pub fn build_prompt(page_text: &str) -> String {
    let mut prompt = String::with_capacity(EXTRACTION_PROMPT.len() + page_text.len());
    prompt.push_str(EXTRACTION_PROMPT);
    prompt.push_str(page_text);
    prompt
}

/// Turns page text into [`ExtractedEntities`] with one chat completion.
#[derive(Clone)]
pub struct EntityExtractor {
    ai: Arc<dyn BaseAI>,
    schema: SchemaDescriptor,
    model: String,
}

impl EntityExtractor {
    pub fn new(ai: Arc<dyn BaseAI>, schema: SchemaDescriptor) -> Self {
        Self {
            ai,
            schema,
            model: EXTRACTION_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_for(&self, page_text: &str) -> ChatRequest {
        ChatRequest::new(self.model.clone())
            .message(Message::user(build_prompt(page_text)))
            .temperature(0.0)
            .response_format(self.schema.response_format())
    }

    pub async fn extract(
        &self,
        page_text: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractedEntities> {
        let request = self.request_for(page_text);
        let completion = self.ai.chat_completion(&request, cancel).await?;
        let entities = parse_completion(&completion)?;

        debug!(
            model = %self.model,
            companies = entities.companies.len(),
            people = entities.people.len(),
            "Extracted entities"
        );

        Ok(entities)
    }
}

/// Decode the first choice of `completion`.
pub fn parse_completion(completion: &ChatCompletion) -> Result<ExtractedEntities> {
    let choice = completion
        .first_choice()
        .ok_or(ExtractionError::NoChoicesReturned)?;

    let content = match (&choice.message.content, &choice.message.refusal) {
        (Some(content), _) => content,
        (None, Some(refusal)) => {
            warn!(refusal = %refusal, "Model refused to extract");
            return Err(ExtractionError::MalformedExtraction(format!(
                "model refused: {refusal}"
            )));
        }
        (None, None) => {
            return Err(ExtractionError::MalformedExtraction(
                "completion has no content".to_string(),
            ))
        }
    };

    serde_json::from_str(content).map_err(|e| {
        warn!(error = %e, "Completion did not match the extraction schema");
        ExtractionError::MalformedExtraction(e.to_string())
    })
}
