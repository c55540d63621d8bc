//! Weekly plan controller

mod controller;
mod error;

pub use controller::{MergeOutcome, Planner, WeekView};
pub use error::PlanError;
