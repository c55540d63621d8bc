//! Extraction oracle adapter
//!
//! Turns free text into structured tasks via one oracle call. Stateless;
//! the only side effect is the outbound request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{OracleError, parse::recover_json};
use crate::domain::Task;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{ExtractContext, PromptLoader};

/// Result of a task extraction call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Clarifying questions the oracle chose to ask, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
}

/// Adapter around the generation oracle for task extraction
pub struct TaskExtractor {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl TaskExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        Self { llm, prompts }
    }

    /// Extract tasks from the user's free text
    ///
    /// Empty input short-circuits without calling the oracle.
    pub async fn extract_tasks(&self, free_text: &str) -> Result<Extraction, OracleError> {
        let text = free_text.trim();
        debug!(text_len = text.len(), "extract_tasks: called");
        if text.is_empty() {
            return Err(OracleError::EmptyInput);
        }

        let prompt = self
            .prompts
            .extract_prompt(&ExtractContext { text: text.to_string() })
            .map_err(|e| OracleError::Prompt(e.to_string()))?;

        let response = self.llm.complete(CompletionRequest { prompt }).await?;
        let raw = response.content.unwrap_or_default();

        let value = recover_json(&raw)?;
        let extraction: Extraction =
            serde_json::from_value(value).map_err(|_| OracleError::Malformed { raw })?;

        info!(
            task_count = extraction.tasks.len(),
            question_count = extraction.questions.len(),
            "extract_tasks: done"
        );
        Ok(extraction)
    }
}
