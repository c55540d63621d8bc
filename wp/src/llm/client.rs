//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless generation-oracle client - each call is independent
///
/// A completion request carries one prompt and gets back raw text. No
/// conversation state is kept between calls; every prompt the planner sends
/// already contains all the context the oracle needs.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

pub mod mock {
    //! Scripted client for tests - replays canned responses in order

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tracing::debug;

    use super::*;

    /// Mock LLM client replaying a fixed list of responses
    pub struct MockLlmClient {
        responses: Vec<CompletionResponse>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience constructor from raw response texts
        pub fn from_texts(texts: &[&str]) -> Self {
            Self::new(
                texts
                    .iter()
                    .map(|t| CompletionResponse {
                        content: Some((*t).to_string()),
                        usage: Default::default(),
                    })
                    .collect(),
            )
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: fetching response");
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }
    }

}
