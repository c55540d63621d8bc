//! Scheduling oracle adapter
//!
//! Sends the existing week, the full task list, and the newly extracted
//! tasks to the oracle and gets back a complete replacement schedule plus
//! free-text change and conflict lists. Block placement policy (minimal
//! disruption, 30-120 minute blocks, no 00:00-06:00 slots, due dates
//! respected, unplaceable tasks surfaced as conflicts) lives in the prompt;
//! the adapter does not verify any of it.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::{OracleError, parse::recover_json};
use crate::domain::{DaySchedule, Task};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptLoader, UpdateWeekContext};

/// Result of a schedule update call
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleUpdate {
    /// The complete new weekly plan - a replacement, not a diff
    #[serde(default)]
    pub weekly_plan: Vec<DaySchedule>,
    #[serde(default)]
    pub changes: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
}

/// Adapter around the generation oracle for weekly scheduling
pub struct WeekScheduler {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl WeekScheduler {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        Self { llm, prompts }
    }

    /// Ask the oracle for an updated week given the merged task list
    pub async fn update_week(
        &self,
        existing_plan: &[DaySchedule],
        all_tasks: &[Task],
        new_tasks: &[Task],
        timezone: &str,
    ) -> Result<ScheduleUpdate, OracleError> {
        debug!(
            existing_days = existing_plan.len(),
            all_tasks = all_tasks.len(),
            new_tasks = new_tasks.len(),
            "update_week: called"
        );

        let context = UpdateWeekContext {
            existing_plan: serde_json::to_string(existing_plan).map_err(json_err)?,
            all_tasks: serde_json::to_string(all_tasks).map_err(json_err)?,
            new_tasks: serde_json::to_string(new_tasks).map_err(json_err)?,
            timezone: timezone.to_string(),
        };
        let prompt = self
            .prompts
            .update_week_prompt(&context)
            .map_err(|e| OracleError::Prompt(e.to_string()))?;

        let response = self.llm.complete(CompletionRequest { prompt }).await?;
        let raw = response.content.unwrap_or_default();

        let value = recover_json(&raw)?;
        let update: ScheduleUpdate =
            serde_json::from_value(value).map_err(|_| OracleError::Malformed { raw })?;

        info!(
            days = update.weekly_plan.len(),
            changes = update.changes.len(),
            conflicts = update.conflicts.len(),
            "update_week: done"
        );
        Ok(update)
    }
}

fn json_err(e: serde_json::Error) -> OracleError {
    OracleError::Call(crate::llm::LlmError::Json(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    fn scheduler(texts: &[&str]) -> WeekScheduler {
        WeekScheduler::new(
            Arc::new(MockLlmClient::from_texts(texts)),
            Arc::new(PromptLoader::embedded_only()),
        )
    }

    #[tokio::test]
    async fn test_parses_full_update() {
        let response = r#"{
            "weekly_plan": [
                {"day": "Monday", "blocks": [{"start":"09:00","end":"10:00","task":"x"}]}
            ],
            "changes": ["Added x to Monday morning"],
            "conflicts": []
        }"#;
        let s = scheduler(&[response]);
        let update = s.update_week(&[], &[Task::new("x")], &[Task::new("x")], "UTC").await.unwrap();
        assert_eq!(update.weekly_plan.len(), 1);
        assert_eq!(update.weekly_plan[0].blocks[0].task, "x");
        assert_eq!(update.changes.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_keys_default_to_empty() {
        let s = scheduler(&["{\"weekly_plan\": []}"]);
        let update = s.update_week(&[], &[], &[], "UTC").await.unwrap();
        assert!(update.weekly_plan.is_empty());
        assert!(update.changes.is_empty());
        assert!(update.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_prose_response_is_malformed() {
        let s = scheduler(&["Sorry, I had trouble with that."]);
        let result = s.update_week(&[], &[], &[], "UTC").await;
        assert!(matches!(result, Err(OracleError::Malformed { .. })));
    }
}
