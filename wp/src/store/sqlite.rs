//! PlanStore over a docstore database

use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use docstore::DocStore;

use super::{PlanStore, StoreError};
use crate::domain::{AuditEvent, WeekPlan};

/// Collection holding one WeekPlan document per `{user_id}__{week_id}`
const WEEKLY_PLANS_COL: &str = "weekly_plans";

/// Append-only audit event collection
const EVENTS_COL: &str = "events_log";

fn doc_key(user_id: &str, week_id: &str) -> String {
    format!("{}__{}", user_id, week_id)
}

/// Durable plan store backed by docstore/SQLite
///
/// The connection is not Sync, so it sits behind a mutex; requests
/// serialize on it. Acceptable for a single-user planning service.
pub struct DocPlanStore {
    store: Mutex<DocStore>,
}

impl DocPlanStore {
    /// Open or create the backing database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        debug!(path = %path.as_ref().display(), "DocPlanStore::open: called");
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let store = DocStore::open(path)?;
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    /// In-memory variant for tests and ephemeral runs
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = DocStore::open_in_memory()?;
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DocStore>, StoreError> {
        self.store
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl PlanStore for DocPlanStore {
    fn load(&self, user_id: &str, week_id: &str) -> Result<Option<WeekPlan>, StoreError> {
        let key = doc_key(user_id, week_id);
        debug!(%key, "DocPlanStore::load: called");
        let value = self.lock()?.get(WEEKLY_PLANS_COL, &key)?;
        match value {
            Some(value) => {
                // serde defaults on WeekPlan cover fields the document predates
                let plan: WeekPlan =
                    serde_json::from_value(value).map_err(|e| StoreError::Corrupt(format!("{}: {}", key, e)))?;
                Ok(Some(plan))
            }
            None => Ok(None),
        }
    }

    fn save(&self, plan: &WeekPlan) -> Result<(), StoreError> {
        let key = plan.doc_key();
        debug!(%key, version = plan.version, "DocPlanStore::save: called");
        let value = serde_json::to_value(plan).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.lock()?.put(WEEKLY_PLANS_COL, &key, &value)?;
        Ok(())
    }

    fn append_event(&self, event: &AuditEvent) -> Result<(), StoreError> {
        debug!(kind = %event.kind, week_id = %event.week_id, "DocPlanStore::append_event: called");
        let value = serde_json::to_value(event).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.lock()?.append(EVENTS_COL, &value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;

    #[test]
    fn test_save_load_round_trip() {
        let store = DocPlanStore::open_in_memory().unwrap();
        let mut plan = WeekPlan::new("default", "2026-W08", "2026-02-16T00:00:00Z");
        plan.tasks.push(Task::new("write report"));
        plan.version = 2;
        store.save(&plan).unwrap();

        let loaded = store.load("default", "2026-W08").unwrap().unwrap();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn test_load_absent_returns_none() {
        let store = DocPlanStore::open_in_memory().unwrap();
        assert!(store.load("default", "2026-W08").unwrap().is_none());
    }

    #[test]
    fn test_save_is_last_write_wins() {
        let store = DocPlanStore::open_in_memory().unwrap();
        let mut a = WeekPlan::new("default", "2026-W08", "t");
        a.tasks.push(Task::new("from writer A"));
        a.version = 1;

        let mut b = WeekPlan::new("default", "2026-W08", "t");
        b.tasks.push(Task::new("from writer B"));
        b.version = 1;

        store.save(&a).unwrap();
        store.save(&b).unwrap();

        // No version check: B's overwrite discards A's tasks entirely
        let loaded = store.load("default", "2026-W08").unwrap().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].title, "from writer B");
    }

    #[test]
    fn test_forward_compatible_load_of_sparse_document() {
        let store = DocPlanStore::open_in_memory().unwrap();
        // Simulate a document written by an older service version
        store
            .lock()
            .unwrap()
            .put(
                WEEKLY_PLANS_COL,
                "default__2026-W08",
                &serde_json::json!({"user_id": "default", "week_id": "2026-W08"}),
            )
            .unwrap();

        let plan = store.load("default", "2026-W08").unwrap().unwrap();
        assert_eq!(plan.version, 0);
        assert!(plan.tasks.is_empty());
    }

    #[test]
    fn test_append_event_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocPlanStore::open(dir.path().join("wp.db")).unwrap();
        store
            .append_event(&AuditEvent {
                kind: "api_add_text".to_string(),
                user_id: "default".to_string(),
                week_id: "2026-W08".to_string(),
                new_tasks: vec![],
                changes: vec![],
                conflicts: vec![],
                created_at: "t".to_string(),
            })
            .unwrap();
    }
}
