//! Oracle adapters
//!
//! The generation oracle is untrusted: its text output usually contains a
//! JSON object but may be wrapped in prose or code fences, or may be no JSON
//! at all. This module owns the recovery heuristic ([`parse::recover_json`])
//! and the two adapters built on it: [`TaskExtractor`] and [`WeekScheduler`].
//!
//! Neither adapter validates the oracle's schedule semantics (block overlap,
//! time ranges, due dates). Those are instructions to the oracle, stated in
//! the prompt; whatever comes back is passed through.

use thiserror::Error;

mod extract;
pub mod parse;
mod schedule;

pub use extract::{Extraction, TaskExtractor};
pub use schedule::{ScheduleUpdate, WeekScheduler};

use crate::llm::LlmError;

/// Errors from an oracle adapter call
#[derive(Debug, Error)]
pub enum OracleError {
    /// The caller submitted no text; the oracle was never invoked
    #[error("Empty input")]
    EmptyInput,

    /// The oracle's text could not be coerced to JSON even after
    /// fence/brace recovery; the raw text is kept for diagnostics
    #[error("Oracle did not return valid JSON")]
    Malformed { raw: String },

    /// Transport/auth/quota failure talking to the oracle
    #[error("Oracle call failed: {0}")]
    Call(#[from] LlmError),

    /// A prompt template failed to load or render
    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}
