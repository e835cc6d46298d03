/*!
 * Scripted provider for testing.
 *
 * The mock replays queued replies in order and records every call it
 * receives. When the queue is empty it falls back to its default reply:
 * - `MockProvider::working()` - answers every call with a fixed text
 * - `MockProvider::failing()` - fails every call with a connection error
 * - `MockProvider::scripted(..)` - replays the given replies, then keeps
 *   answering with the last one
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::Provider;
use super::openai::{CompletionCall, OpenAIChoice, OpenAIMessage, OpenAIResponse};
use crate::errors::ProviderError;

/// One scripted outcome
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// A successful reply with this content
    Text(String),
    /// A 2xx response without any choices
    NoChoices,
    /// A non-success status with a server message
    ApiError { status: u16, message: String },
    /// No response at all
    Connection(String),
    /// A body that could not be parsed
    Malformed(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    fn into_result(self) -> Result<OpenAIResponse, ProviderError> {
        match self {
            MockReply::Text(text) => Ok(OpenAIResponse {
                choices: vec![OpenAIChoice {
                    message: OpenAIMessage {
                        role: "assistant".to_string(),
                        content: Some(text),
                    },
                }],
                usage: None,
            }),
            MockReply::NoChoices => Ok(OpenAIResponse {
                choices: Vec::new(),
                usage: None,
            }),
            MockReply::ApiError { status, message } => Err(ProviderError::ApiError {
                status_code: status,
                message,
            }),
            MockReply::Connection(message) => Err(ProviderError::ConnectionError(message)),
            MockReply::Malformed(message) => Err(ProviderError::ParseError(message)),
        }
    }
}

/// Mock provider for testing gateway and orchestrator behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Replies still to be served
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Reply served once the queue is empty
    fallback: MockReply,
    /// Every call received, in order
    calls: Arc<Mutex<Vec<CompletionCall>>>,
}

impl MockProvider {
    /// Create a mock with the given default reply and no queued replies
    pub fn new(fallback: MockReply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockReply::text("mock translation"))
    }

    /// A mock that never gets a response
    pub fn failing() -> Self {
        Self::new(MockReply::Connection("connection refused".to_string()))
    }

    /// A mock that replays `replies`, then repeats the last one
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let fallback = replies
            .last()
            .cloned()
            .unwrap_or_else(|| MockReply::text("mock translation"));
        let mock = Self::new(fallback);
        mock.replies.lock().extend(replies);
        mock
    }

    /// Queue one more reply
    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().push_back(reply);
    }

    /// Snapshot of every call received so far
    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// User prompt of each call received so far
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| call.body.user_prompt().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = CompletionCall;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.calls.lock().push(request);

        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        reply.into_result()
    }

    fn extract_text(response: &Self::Response) -> Option<String> {
        super::openai::extract_first_choice(response)
    }
}
