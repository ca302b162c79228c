// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use openai_client::{ChatChoice, ChatCompletion, ChatRequest, ChoiceMessage};
use tokio_util::sync::CancellationToken;

use super::{BaseAI, BasePageFetcher, MemoryExtractedDataStore, ServerDeps};
use crate::common::with_cancel;
use crate::domains::extraction::{EntityExtractor, ExtractedEntities, SchemaDescriptor};
use crate::error::{ExtractionError, Result};

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Canned outcome of a mock fetch
#[derive(Debug, Clone)]
pub enum MockPage {
    Body(String),
    NotFound,
    Unavailable,
}

pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, MockPage>>>,
    default_page: Arc<Mutex<Option<MockPage>>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            default_page: Arc::new(Mutex::new(None)),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every url with `body`
    pub fn with_body(self, body: &str) -> Self {
        *self.default_page.lock().unwrap() = Some(MockPage::Body(body.to_string()));
        self
    }

    /// Answer `url` with `page`, overriding the default
    pub fn with_page(self, url: &str, page: MockPage) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), page);
        self
    }

    pub fn with_not_found(self) -> Self {
        *self.default_page.lock().unwrap() = Some(MockPage::NotFound);
        self
    }

    pub fn with_unavailable(self) -> Self {
        *self.default_page.lock().unwrap() = Some(MockPage::Unavailable);
        self
    }

    /// Hold every fetch for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Urls fetched so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let page = self
            .pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .or_else(|| self.default_page.lock().unwrap().clone());

        with_cancel(cancel, async {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match page {
                Some(MockPage::Body(body)) => Ok(body),
                Some(MockPage::NotFound) => Err(ExtractionError::PageNotFound),
                Some(MockPage::Unavailable) => Err(ExtractionError::ServiceUnavailable(
                    "mock page unavailable".to_string(),
                )),
                None => Err(ExtractionError::ServiceUnavailable(
                    format!("no mock page for {url}"),
                )),
            }
        })
        .await
    }
}

// =============================================================================
// Mock AI
// =============================================================================

pub struct MockAI {
    completions: Arc<Mutex<Vec<ChatCompletion>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    delay: Option<Duration>,
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Queue a completion whose only choice carries `content`
    pub fn with_content(self, content: &str) -> Self {
        self.with_completion(completion_with_content(content))
    }

    /// Queue a completion holding `entities` as JSON
    pub fn with_entities(self, entities: &ExtractedEntities) -> Self {
        let content = serde_json::to_string(entities).unwrap();
        self.with_content(&content)
    }

    /// Queue a completion with an empty `choices` list
    pub fn with_no_choices(self) -> Self {
        self.with_completion(ChatCompletion {
            id: Some("chatcmpl-mock".to_string()),
            model: None,
            choices: Vec::new(),
            usage: None,
        })
    }

    pub fn with_completion(self, completion: ChatCompletion) -> Self {
        self.completions.lock().unwrap().push(completion);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// A completion whose single choice carries `content`
pub fn completion_with_content(content: &str) -> ChatCompletion {
    ChatCompletion {
        id: Some("chatcmpl-mock".to_string()),
        model: Some("gpt-4o-2024-08-06".to_string()),
        choices: vec![ChatChoice {
            index: 0,
            message: ChoiceMessage {
                role: Some("assistant".to_string()),
                content: Some(content.to_string()),
                refusal: None,
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn chat_completion(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<ChatCompletion> {
        self.requests.lock().unwrap().push(request.clone());

        // Queued completions are served in order; the last one repeats.
        let completion = {
            let mut queue = self.completions.lock().unwrap();
            if queue.len() > 1 {
                Some(queue.remove(0))
            } else {
                queue.first().cloned()
            }
        };

        with_cancel(cancel, async {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            completion.ok_or_else(|| {
                ExtractionError::ServiceUnavailable("no mock completion queued".to_string())
            })
        })
        .await
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks plus an in-memory store, with handles kept for assertions
pub struct TestDependencies {
    pub fetcher: Arc<MockPageFetcher>,
    pub ai: Arc<MockAI>,
    pub store: Arc<MemoryExtractedDataStore>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(MockPageFetcher::new()),
            ai: Arc::new(MockAI::new()),
            store: Arc::new(MemoryExtractedDataStore::new()),
        }
    }

    pub fn mock_fetcher(mut self, fetcher: MockPageFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn store(mut self, store: MemoryExtractedDataStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        let extractor =
            EntityExtractor::new(self.ai.clone(), SchemaDescriptor::for_extracted_entities());
        ServerDeps::new(self.fetcher.clone(), Arc::new(extractor), self.store.clone())
    }
}
