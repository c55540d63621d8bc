//! In-memory PlanStore for tests and ephemeral runs

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::{PlanStore, StoreError};
use crate::domain::{AuditEvent, WeekPlan};

/// HashMap-backed store with the same overwrite semantics as the durable one
#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<String, WeekPlan>>,
    events: Mutex<Vec<AuditEvent>>,
    /// When set, every save fails - for exercising abort paths in tests
    fail_saves: AtomicBool,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with a backend error
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the appended audit events
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("events mutex").clone()
    }
}

impl PlanStore for MemoryPlanStore {
    fn load(&self, user_id: &str, week_id: &str) -> Result<Option<WeekPlan>, StoreError> {
        let key = format!("{}__{}", user_id, week_id);
        debug!(%key, "MemoryPlanStore::load: called");
        Ok(self.plans.lock().expect("plans mutex").get(&key).cloned())
    }

    fn save(&self, plan: &WeekPlan) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected save failure".to_string()));
        }
        debug!(key = %plan.doc_key(), version = plan.version, "MemoryPlanStore::save: called");
        self.plans
            .lock()
            .expect("plans mutex")
            .insert(plan.doc_key(), plan.clone());
        Ok(())
    }

    fn append_event(&self, event: &AuditEvent) -> Result<(), StoreError> {
        debug!(kind = %event.kind, "MemoryPlanStore::append_event: called");
        self.events.lock().expect("events mutex").push(event.clone());
        Ok(())
    }
}
