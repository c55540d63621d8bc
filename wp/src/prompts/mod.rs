//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for the two oracle
//! calls: task extraction and weekly schedule update.
//!
//! Template loading chain:
//! 1. `{prompts_dir}/{name}.pmt` (configured override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax; context values are inserted with
//! triple-stache so JSON and user text land in the prompt unescaped.

pub mod embedded;
mod loader;

pub use loader::{ExtractContext, PromptLoader, UpdateWeekContext};
