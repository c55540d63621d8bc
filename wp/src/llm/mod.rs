//! LLM client module
//!
//! Wraps the external generation oracle behind the [`LlmClient`] trait.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod client;
mod error;
mod gemini;

pub use client::LlmClient;
pub use client::mock::MockLlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;

use crate::config::OracleConfig;

/// A single completion request: one self-contained prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

/// Token accounting reported by the oracle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The oracle's raw text response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Raw response text; None when the oracle returned nothing
    pub content: Option<String>,
    pub usage: TokenUsage,
}

/// Create an LLM client from oracle configuration
pub fn create_client(config: &OracleConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, "create_client: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
