//! Planner error taxonomy
//!
//! Every failure in a planning operation degrades to one of these values;
//! nothing here is fatal to the process and nothing is retried.

use thiserror::Error;

use crate::calendar::CalendarError;
use crate::llm::LlmError;
use crate::oracle::OracleError;
use crate::store::StoreError;

/// Errors surfaced by planner operations
#[derive(Debug, Error)]
pub enum PlanError {
    /// The action required text and none was submitted; no oracle call,
    /// no mutation, no log entry
    #[error("Please provide some text first.")]
    EmptyInput,

    /// Extraction succeeded syntactically but yielded zero tasks
    #[error("Extracted task list is empty.")]
    EmptyExtraction,

    /// Oracle text could not be coerced to JSON; raw text retained
    #[error("Model did not return valid JSON")]
    MalformedOracleResponse { raw: String },

    /// Transport/auth/quota failure talking to the oracle
    #[error("Oracle call failed: {0}")]
    OracleCallFailure(#[source] LlmError),

    /// A stored week identifier does not parse; only reachable via
    /// corrupted stored state
    #[error(transparent)]
    InvalidWeekId(#[from] CalendarError),

    /// Persistence layer failure; the operation is considered failed
    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl From<OracleError> for PlanError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::EmptyInput => PlanError::EmptyInput,
            OracleError::Malformed { raw } => PlanError::MalformedOracleResponse { raw },
            OracleError::Call(e) => PlanError::OracleCallFailure(e),
            OracleError::Prompt(msg) => PlanError::OracleCallFailure(LlmError::InvalidResponse(msg)),
        }
    }
}

impl PlanError {
    /// True for errors caused by what the user submitted rather than by
    /// the oracle or the store
    pub fn is_validation(&self) -> bool {
        matches!(self, PlanError::EmptyInput | PlanError::EmptyExtraction)
    }
}
