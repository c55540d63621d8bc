//! Domain types for the weekly planner
//!
//! Task and Block records come back from an untrusted generation oracle, so
//! both keep unrecognized fields in a flattened side-map instead of dropping
//! them. WeekPlan fields all default on deserialization so documents written
//! by older versions of the service load cleanly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One actionable task extracted from user text
///
/// Only `title` is required; everything else is best-effort oracle output
/// passed through opaquely. The service does not validate these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    /// Free-form date-like string, e.g. "2026-02-23" or "Friday"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<f64>,
    /// One of low|medium|high when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Unrecognized oracle keys, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due: None,
            estimated_minutes: None,
            priority: None,
            category: None,
            notes: None,
            extra: Map::new(),
        }
    }
}

/// A single scheduled time interval within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// "HH:MM"
    pub start: String,
    /// "HH:MM"
    pub end: String,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One weekday's schedule as returned by the scheduling oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Weekday name, expected in {Monday..Sunday}
    pub day: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// The per-user, per-ISO-week persisted schedule document
///
/// Exactly one exists per `(user_id, week_id)` pair, created lazily and
/// never deleted. `tasks` is append-only across the week's lifetime;
/// `weekly_plan` is replaced wholesale on every successful merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub week_id: String,
    /// Incremented by exactly 1 on every successful merge; starts at 0
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub weekly_plan: Vec<DaySchedule>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl WeekPlan {
    /// Fresh document for a `(user, week)` pair that has no stored state yet
    pub fn new(user_id: impl Into<String>, week_id: impl Into<String>, now: impl Into<String>) -> Self {
        let now = now.into();
        Self {
            user_id: user_id.into(),
            week_id: week_id.into(),
            version: 0,
            tasks: Vec::new(),
            weekly_plan: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Composite storage key, `{user_id}__{week_id}`
    pub fn doc_key(&self) -> String {
        format!("{}__{}", self.user_id, self.week_id)
    }
}

/// Append-only audit record emitted after each successful merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Tag naming the action, e.g. "ui_add_to_week" or "api_add_text"
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: String,
    pub week_id: String,
    pub new_tasks: Vec<Task>,
    pub changes: Vec<String>,
    pub conflicts: Vec<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_week_plan_starts_at_version_zero() {
        let plan = WeekPlan::new("default", "2026-W08", "2026-02-16T00:00:00Z");
        assert_eq!(plan.version, 0);
        assert!(plan.tasks.is_empty());
        assert!(plan.weekly_plan.is_empty());
        assert_eq!(plan.created_at, plan.updated_at);
        assert_eq!(plan.doc_key(), "default__2026-W08");
    }

    #[test]
    fn test_task_preserves_unrecognized_fields() {
        let raw = json!({
            "title": "file taxes",
            "priority": "high",
            "urgency_score": 0.9,
            "source": "email"
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.title, "file taxes");
        assert_eq!(task.extra["urgency_score"], 0.9);
        assert_eq!(task.extra["source"], "email");

        // Round-trips back out with the extra keys intact
        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["urgency_score"], 0.9);
        assert_eq!(out["source"], "email");
    }

    #[test]
    fn test_week_plan_forward_compatible_deserialization() {
        // A document written before some fields existed still loads,
        // with the missing fields defaulted
        let raw = json!({
            "user_id": "default",
            "week_id": "2026-W08"
        });
        let plan: WeekPlan = serde_json::from_value(raw).unwrap();
        assert_eq!(plan.version, 0);
        assert!(plan.tasks.is_empty());
        assert!(plan.weekly_plan.is_empty());
        assert_eq!(plan.created_at, "");
    }

    #[test]
    fn test_audit_event_serializes_kind_as_type() {
        let event = AuditEvent {
            kind: "api_add_text".to_string(),
            user_id: "default".to_string(),
            week_id: "2026-W08".to_string(),
            new_tasks: vec![Task::new("x")],
            changes: vec![],
            conflicts: vec![],
            created_at: "2026-02-16T00:00:00Z".to_string(),
        };
        let out = serde_json::to_value(&event).unwrap();
        assert_eq!(out["type"], "api_add_text");
    }
}
