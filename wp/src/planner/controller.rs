//! Weekly plan controller - the merge state machine
//!
//! One merge operation runs strictly sequentially: load (or init) the
//! current week, extract tasks from the submitted text, concatenate them
//! onto the week's task list, ask the scheduling oracle for a replacement
//! plan, then commit with a version bump, append an audit event, and render
//! the dated view. An oracle or store failure at any step before the commit
//! aborts with zero mutation; the merged task list computed in memory is
//! simply discarded.
//!
//! There is no cross-request coordination: two concurrent merges for the
//! same (user, week) both read the same base document and the later save
//! wins wholesale (see the store module).

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::PlanError;
use crate::calendar::{self, DatedDay};
use crate::domain::{AuditEvent, DaySchedule, Task, WeekPlan};
use crate::llm::LlmClient;
use crate::oracle::{Extraction, TaskExtractor, WeekScheduler};
use crate::prompts::PromptLoader;
use crate::store::PlanStore;

/// The current week rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub week_id: String,
    pub version: u64,
    /// Always seven entries, Monday..Sunday, each with its calendar date
    pub days: Vec<DatedDay>,
}

/// Result of a successful merge operation
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub week_id: String,
    pub version: u64,
    pub changes: Vec<String>,
    pub conflicts: Vec<String>,
    pub weekly_plan: Vec<DaySchedule>,
    pub days: Vec<DatedDay>,
}

/// Orchestrates the two oracle adapters and the store
pub struct Planner {
    store: Arc<dyn PlanStore>,
    extractor: TaskExtractor,
    scheduler: WeekScheduler,
    tz: Tz,
}

impl Planner {
    pub fn new(store: Arc<dyn PlanStore>, llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, tz: Tz) -> Self {
        Self {
            store,
            extractor: TaskExtractor::new(llm.clone(), prompts.clone()),
            scheduler: WeekScheduler::new(llm, prompts),
            tz,
        }
    }

    /// Week id for "today" in the configured timezone
    pub fn current_week_id(&self) -> String {
        calendar::current_week_id(self.tz)
    }

    /// Load (or lazily create) the current week's stored document
    pub fn load_week(&self, user_id: &str) -> Result<WeekPlan, PlanError> {
        let week_id = self.current_week_id();
        let plan = self
            .store
            .load_or_init(user_id, &week_id, &calendar::now_utc_iso())?;
        Ok(plan)
    }

    /// Render the current week with calendar dates
    pub fn view_week(&self, user_id: &str) -> Result<WeekView, PlanError> {
        let plan = self.load_week(user_id)?;
        Self::render_view(&plan)
    }

    /// Run extraction only - no mutation, nothing persisted
    pub async fn extract_preview(&self, text: &str) -> Result<Extraction, PlanError> {
        debug!(text_len = text.len(), "extract_preview: called");
        Ok(self.extractor.extract_tasks(text).await?)
    }

    /// Full pipeline: extract tasks from text, then merge them into the week
    pub async fn add_text(&self, user_id: &str, text: &str, event_kind: &str) -> Result<MergeOutcome, PlanError> {
        debug!(%user_id, %event_kind, "add_text: called");
        // The week document is created (and persisted) even when the
        // extraction that follows fails
        let plan = self.load_week(user_id)?;
        let extraction = self.extractor.extract_tasks(text).await?;
        self.merge_into(plan, extraction.tasks, event_kind).await
    }

    /// Merge already-extracted (client-staged) tasks into the week
    pub async fn confirm_add(
        &self,
        user_id: &str,
        new_tasks: Vec<Task>,
        event_kind: &str,
    ) -> Result<MergeOutcome, PlanError> {
        debug!(%user_id, count = new_tasks.len(), %event_kind, "confirm_add: called");
        let plan = self.load_week(user_id)?;
        self.merge_into(plan, new_tasks, event_kind).await
    }

    /// Steps 3-8 of the merge: validate, concatenate, reschedule, commit,
    /// audit, render
    async fn merge_into(
        &self,
        mut plan: WeekPlan,
        new_tasks: Vec<Task>,
        event_kind: &str,
    ) -> Result<MergeOutcome, PlanError> {
        if new_tasks.is_empty() {
            debug!("merge_into: nothing to add");
            return Err(PlanError::EmptyExtraction);
        }

        // Simple concatenation: no deduplication, no identity
        // reconciliation. A task extracted twice is stored twice.
        let mut all_tasks = plan.tasks.clone();
        all_tasks.extend(new_tasks.clone());

        // Abort point: nothing has been persisted yet, so a scheduling
        // failure discards the merged list entirely
        let update = self
            .scheduler
            .update_week(&plan.weekly_plan, &all_tasks, &new_tasks, self.tz.name())
            .await?;

        // Commit: tasks appended, plan replaced wholesale, version bumped
        plan.tasks = all_tasks;
        plan.weekly_plan = update.weekly_plan;
        plan.version += 1;
        plan.updated_at = calendar::now_utc_iso();
        self.store.save(&plan)?;

        info!(
            week_id = %plan.week_id,
            version = plan.version,
            new_tasks = new_tasks.len(),
            conflicts = update.conflicts.len(),
            "merge_into: committed"
        );

        if let Err(e) = self.store.append_event(&AuditEvent {
            kind: event_kind.to_string(),
            user_id: plan.user_id.clone(),
            week_id: plan.week_id.clone(),
            new_tasks,
            changes: update.changes.clone(),
            conflicts: update.conflicts.clone(),
            created_at: calendar::now_utc_iso(),
        }) {
            // The merge itself is already durable; a lost audit record is
            // logged but does not fail the operation
            warn!(error = %e, "merge_into: failed to append audit event");
        }

        let days = calendar::expand_week_with_dates(&plan.week_id, &plan.weekly_plan)?;
        Ok(MergeOutcome {
            week_id: plan.week_id,
            version: plan.version,
            changes: update.changes,
            conflicts: update.conflicts,
            weekly_plan: plan.weekly_plan,
            days,
        })
    }

    fn render_view(plan: &WeekPlan) -> Result<WeekView, PlanError> {
        let days = calendar::expand_week_with_dates(&plan.week_id, &plan.weekly_plan)?;
        Ok(WeekView {
            week_id: plan.week_id.clone(),
            version: plan.version,
            days,
        })
    }
}
