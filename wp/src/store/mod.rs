//! Week plan persistence
//!
//! [`PlanStore`] is the narrow interface the planner is handed: get-or-
//! absent reads, full-document overwrites, and append-only audit events.
//! `save` is last-write-wins with no version check; two concurrent merges
//! for the same `(user, week)` race on the whole document and the later
//! save silently discards the earlier one. That hazard is inherent to the
//! design and documented rather than papered over with locking.

use thiserror::Error;
use tracing::debug;

mod memory;
mod sqlite;

pub use memory::MemoryPlanStore;
pub use sqlite::DocPlanStore;

use crate::domain::{AuditEvent, WeekPlan};

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Stored document is corrupt: {0}")]
    Corrupt(String),
}

impl From<eyre::Report> for StoreError {
    fn from(report: eyre::Report) -> Self {
        StoreError::Backend(report.to_string())
    }
}

/// Storage interface injected into the planner
///
/// One document per `(user_id, week_id)`, addressed by the composite key
/// `{user_id}__{week_id}`. Events are write-only from the service's
/// perspective; nothing in the core reads them back.
pub trait PlanStore: Send + Sync {
    /// Fetch the stored plan, or None if absent
    fn load(&self, user_id: &str, week_id: &str) -> Result<Option<WeekPlan>, StoreError>;

    /// Fully overwrite the stored document at the plan's key
    fn save(&self, plan: &WeekPlan) -> Result<(), StoreError>;

    /// Append an immutable audit record
    fn append_event(&self, event: &AuditEvent) -> Result<(), StoreError>;

    /// Load the week's plan, creating and persisting a fresh one if absent
    ///
    /// A fresh plan starts at version 0 with empty tasks and schedule, both
    /// timestamps set to `now`. Stored documents written by older versions
    /// of the service come back with missing fields defaulted.
    fn load_or_init(&self, user_id: &str, week_id: &str, now: &str) -> Result<WeekPlan, StoreError> {
        debug!(%user_id, %week_id, "load_or_init: called");
        if let Some(plan) = self.load(user_id, week_id)? {
            return Ok(plan);
        }
        debug!(%user_id, %week_id, "load_or_init: initializing new week");
        let plan = WeekPlan::new(user_id, week_id, now);
        self.save(&plan)?;
        Ok(plan)
    }
}
