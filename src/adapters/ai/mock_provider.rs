//! Mock AI Provider for testing.
//!
//! Configurable mock implementation of the AiProvider port, allowing tests
//! to run without calling a real AI API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_response("Hello, I'm the assistant!");
//!
//! let response = provider.complete(request).await?;
//! assert_eq!(response.content, "Hello, I'm the assistant!");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// A configured mock response.
#[derive(Debug, Clone)]
enum MockResponse {
    /// Return a successful completion.
    Success(String),
    /// Return an unavailable error.
    Unavailable(String),
    /// Return a timeout error.
    Timeout,
}

/// Mock AI provider for testing.
///
/// Returns configured responses in order; when the queue is empty the last
/// configured response repeats.
#[derive(Debug, Clone, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    last: Arc<Mutex<Option<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAiProvider {
    /// Creates a new mock provider with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success(content.into()));
        self
    }

    /// Queues an unavailable error.
    pub fn with_unavailable(self, message: impl Into<String>) -> Self {
        self.push(MockResponse::Unavailable(message.into()));
        self
    }

    /// Queues a timeout error.
    pub fn with_timeout(self) -> Self {
        self.push(MockResponse::Timeout);
        self
    }

    /// Returns the requests seen so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns how many times `complete` was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response.clone());
        *self.last.lock().unwrap() = Some(response);
    }

    fn next_response(&self) -> Option<MockResponse> {
        let mut queue = self.responses.lock().unwrap();
        queue
            .pop_front()
            .or_else(|| self.last.lock().unwrap().clone())
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        match self.next_response() {
            Some(MockResponse::Success(content)) => Ok(CompletionResponse {
                content,
                model: "mock-model".to_string(),
            }),
            Some(MockResponse::Unavailable(message)) => Err(AiError::unavailable(message)),
            Some(MockResponse::Timeout) => Err(AiError::Timeout { timeout_secs: 60 }),
            None => Ok(CompletionResponse {
                content: "mock reply".to_string(),
                model: "mock-model".to_string(),
            }),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model")
    }
}
