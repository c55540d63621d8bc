//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for rendering the task extraction prompt
#[derive(Debug, Clone, Serialize)]
pub struct ExtractContext {
    /// The user's free text
    pub text: String,
}

/// Context for rendering the schedule update prompt
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWeekContext {
    /// Existing weekly plan, serialized JSON
    pub existing_plan: String,
    /// Full task list (existing + new), serialized JSON
    pub all_tasks: String,
    /// Just-extracted tasks, serialized JSON
    pub new_tasks: String,
    /// IANA timezone name for schedule context
    pub timezone: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    /// Optional override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader with an optional override directory
    pub fn new(override_dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = override_dir.map(|p| p.as_ref().to_path_buf()).filter(|p| p.exists());
        debug!(?override_dir, "PromptLoader::new: called");
        Self {
            hbs: Handlebars::new(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            override_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the override directory first, then the embedded fallback.
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(|s| s.to_string())
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render the task extraction prompt
    pub fn extract_prompt(&self, context: &ExtractContext) -> Result<String> {
        debug!(text_len = context.text.len(), "PromptLoader::extract_prompt: called");
        let template = self.load_template("extract")?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render extract prompt: {}", e))
    }

    /// Render the schedule update prompt
    pub fn update_week_prompt(&self, context: &UpdateWeekContext) -> Result<String> {
        debug!(timezone = %context.timezone, "PromptLoader::update_week_prompt: called");
        let template = self.load_template("update_week")?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render update_week prompt: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prompt_inlines_text_raw() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader
            .extract_prompt(&ExtractContext {
                text: "finish the report & email Bob <friday>".to_string(),
            })
            .unwrap();
        // Triple-stache in the template: no HTML escaping of user text
        assert!(prompt.contains("finish the report & email Bob <friday>"));
        assert!(prompt.contains("task extraction assistant"));
    }

    #[test]
    fn test_update_week_prompt_inlines_all_sections() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader
            .update_week_prompt(&UpdateWeekContext {
                existing_plan: r#"[{"day":"Monday","blocks":[]}]"#.to_string(),
                all_tasks: r#"[{"title":"a"},{"title":"b"}]"#.to_string(),
                new_tasks: r#"[{"title":"b"}]"#.to_string(),
                timezone: "America/New_York".to_string(),
            })
            .unwrap();
        assert!(prompt.contains(r#"[{"day":"Monday","blocks":[]}]"#));
        assert!(prompt.contains(r#"[{"title":"a"},{"title":"b"}]"#));
        assert!(prompt.contains("America/New_York"));
    }

    #[test]
    fn test_override_directory_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("extract.pmt"), "OVERRIDE {{{text}}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let prompt = loader
            .extract_prompt(&ExtractContext {
                text: "hello".to_string(),
            })
            .unwrap();
        assert_eq!(prompt, "OVERRIDE hello");
    }

    #[test]
    fn test_missing_override_dir_falls_back_to_embedded() {
        let loader = PromptLoader::new(Some("/nonexistent/prompts"));
        assert!(
            loader
                .extract_prompt(&ExtractContext {
                    text: "x".to_string()
                })
                .is_ok()
        );
    }
}
