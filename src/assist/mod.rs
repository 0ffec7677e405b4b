//! Writing assistant for plans and task descriptions.
//!
//! The assistant is optional. Every entry point returns a usable value:
//! - no provider configured: a fixed fallback (plan) or a placeholder (description)
//! - provider error or unusable reply: the fallback plan, or the original description
//!
//! Providers implement [`AssistProvider`]; [`GeminiClient`] is the HTTP-backed one.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::config::AssistSettings;
use crate::models::{PlannedTask, TaskStatus};
use thiserror::Error;
use tracing::warn;

/// Returned by `improve_description` when no API key is configured.
pub const MISSING_KEY_PLACEHOLDER: &str = "Please add an API Key to use AI features.";

/// Longest plan accepted from a provider; extra items are dropped.
pub const MAX_PLAN_ITEMS: usize = 5;

/// Errors a provider can report. Never surfaced past [`Assistant`].
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Provider returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// A text-generation backend.
pub trait AssistProvider: Send + Sync {
    /// Suggest starter tasks for a project.
    fn generate_plan(&self, title: &str, description: &str)
    -> Result<Vec<PlannedTask>, AssistError>;

    /// Suggest a clearer description for a task.
    fn improve_description(&self, title: &str, description: &str) -> Result<String, AssistError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// The plan returned whenever a real one is unavailable.
pub fn fallback_plan() -> Vec<PlannedTask> {
    vec![
        PlannedTask::new(
            "Define Requirements",
            "List all core features.",
            TaskStatus::Todo,
        ),
        PlannedTask::new("Setup Repo", "Initialize git repository.", TaskStatus::Todo),
    ]
}

/// Front door for assist features with built-in fallbacks.
pub struct Assistant {
    provider: Option<Box<dyn AssistProvider>>,
}

impl Assistant {
    pub fn new(provider: Box<dyn AssistProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An assistant with no provider; every call returns its fallback.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Build from resolved settings: Gemini when a key is present, else disabled.
    pub fn from_settings(settings: &AssistSettings) -> Self {
        match settings.api_key() {
            Some(key) => Self::new(Box::new(GeminiClient::new(key, settings.model()))),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Starter tasks for a project; the fixed two-item plan on any failure.
    pub fn generate_plan(&self, title: &str, description: &str) -> Vec<PlannedTask> {
        let Some(provider) = &self.provider else {
            warn!("assistant not configured, returning fallback plan");
            return fallback_plan();
        };

        match provider.generate_plan(title, description) {
            Ok(plan) => {
                let plan = normalize_plan(plan);
                if plan.is_empty() {
                    warn!(provider = provider.name(), "empty plan, returning fallback plan");
                    fallback_plan()
                } else {
                    plan
                }
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "plan generation failed, returning fallback plan");
                fallback_plan()
            }
        }
    }

    /// A clearer description; the original text on failure.
    pub fn improve_description(&self, title: &str, description: &str) -> String {
        let Some(provider) = &self.provider else {
            warn!("assistant not configured");
            return MISSING_KEY_PLACEHOLDER.to_string();
        };

        match provider.improve_description(title, description) {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => description.to_string(),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "description improvement failed, keeping original");
                description.to_string()
            }
        }
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .finish()
    }
}

/// Drop untitled items and cap the plan length.
fn normalize_plan(plan: Vec<PlannedTask>) -> Vec<PlannedTask> {
    plan.into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .take(MAX_PLAN_ITEMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Provider returning canned replies.
    struct Canned {
        plan: Result<Vec<PlannedTask>, fn() -> AssistError>,
        description: Result<String, fn() -> AssistError>,
    }

    impl AssistProvider for Canned {
        fn generate_plan(&self, _: &str, _: &str) -> Result<Vec<PlannedTask>, AssistError> {
            self.plan.clone().map_err(|make| make())
        }

        fn improve_description(&self, _: &str, _: &str) -> Result<String, AssistError> {
            self.description.clone().map_err(|make| make())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn failing() -> Assistant {
        Assistant::new(Box::new(Canned {
            plan: Err(|| AssistError::Http("connection refused".to_string())),
            description: Err(|| AssistError::Status {
                code: 500,
                body: String::new(),
            }),
        }))
    }

    fn item(title: &str) -> PlannedTask {
        PlannedTask::new(title, "", TaskStatus::Todo)
    }

    #[test]
    fn test_disabled_returns_fallbacks() {
        let assistant = Assistant::disabled();
        assert!(!assistant.is_enabled());
        assert_eq!(assistant.generate_plan("Launch", ""), fallback_plan());
        assert_eq!(
            assistant.improve_description("Task", "original"),
            MISSING_KEY_PLACEHOLDER
        );
    }

    #[test]
    fn test_failures_degrade() {
        let assistant = failing();
        assert_eq!(assistant.generate_plan("Launch", ""), fallback_plan());
        assert_eq!(assistant.improve_description("Task", "original"), "original");
    }

    #[test]
    fn test_plan_is_capped_and_filtered() {
        let plan = (0..7).map(|i| item(&format!("Step {}", i))).chain([item(" ")]);
        let assistant = Assistant::new(Box::new(Canned {
            plan: Ok(plan.collect()),
            description: Ok("better".to_string()),
        }));

        let result = assistant.generate_plan("Launch", "");
        assert_eq!(result.len(), MAX_PLAN_ITEMS);
        assert_eq!(result[0].title, "Step 0");
    }

    #[test]
    fn test_empty_plan_falls_back() {
        let assistant = Assistant::new(Box::new(Canned {
            plan: Ok(vec![]),
            description: Ok("   ".to_string()),
        }));
        assert_eq!(assistant.generate_plan("Launch", ""), fallback_plan());
        assert_eq!(assistant.improve_description("Task", "original"), "original");
    }

    #[test]
    fn test_improved_description_is_trimmed() {
        let assistant = Assistant::new(Box::new(Canned {
            plan: Ok(vec![item("A")]),
            description: Ok("  Sharper text.\n".to_string()),
        }));
        assert_eq!(assistant.improve_description("Task", "x"), "Sharper text.");
    }

    #[test]
    fn test_fallback_plan_contents() {
        let plan = fallback_plan();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].title, "Define Requirements");
        assert_eq!(plan[1].title, "Setup Repo");
        assert!(plan.iter().all(|p| p.status == TaskStatus::Todo));
    }
}
