//! Weekplan - LLM-assisted weekly task planner service
//!
//! Users submit free text; a generation oracle extracts structured tasks
//! from it; a second oracle call merges those tasks into a persisted
//! Monday-Sunday schedule. One versioned document exists per user per ISO
//! week, with an append-only audit log beside it.
//!
//! # Core Concepts
//!
//! - **One document per (user, ISO week)**: looked up and created lazily,
//!   versioned, never deleted
//! - **Oracle output is untrusted**: JSON is recovered best-effort from
//!   prose and code fences, and failures degrade to structured errors
//! - **Tasks are append-only**: merges concatenate; the schedule itself is
//!   replaced wholesale by whatever the scheduling oracle returns
//! - **Last write wins**: saves carry no version check, so concurrent
//!   merges for the same week race on the whole document
//!
//! # Modules
//!
//! - [`calendar`] - ISO week ids and dated week expansion
//! - [`oracle`] - JSON recovery plus the extraction/scheduling adapters
//! - [`planner`] - the merge state machine
//! - [`store`] - plan persistence interface and backends
//! - [`server`] - axum HTTP surface

pub mod calendar;
pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod oracle;
pub mod planner;
pub mod prompts;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use calendar::{CalendarError, DatedDay, current_week_id, expand_week_with_dates, week_start_date};
pub use config::{Config, OracleConfig};
pub use domain::{AuditEvent, Block, DaySchedule, Task, WeekPlan};
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, create_client};
pub use oracle::{Extraction, OracleError, TaskExtractor, WeekScheduler};
pub use planner::{MergeOutcome, PlanError, Planner, WeekView};
pub use prompts::{ExtractContext, PromptLoader, UpdateWeekContext};
pub use server::{AppState, router};
pub use store::{DocPlanStore, MemoryPlanStore, PlanStore, StoreError};
