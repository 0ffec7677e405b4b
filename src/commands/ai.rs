use super::task::require_task;
use super::{Output, json};
use crate::assist::Assistant;
use crate::models::{PlannedTask, Task};
use crate::{Board, Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub project_id: String,
    pub plan: Vec<PlannedTask>,
    pub applied: bool,
    /// Tasks created when `--apply` was given
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<Task>,
}

impl Output for PlanResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Plan for {}:", self.project_id)];
        for (i, item) in self.plan.iter().enumerate() {
            lines.push(format!("  {}. [{}] {}", i + 1, item.status.label(), item.title));
            if !item.description.is_empty() {
                lines.push(format!("     {}", item.description));
            }
        }
        if self.applied {
            lines.push(format!("Created {} task(s).", self.created.len()));
        }
        lines.join("\n")
    }
}

/// Suggest starter tasks for a project, creating them when `apply` is set.
pub fn ai_plan(board: &mut Board, assistant: &Assistant, project_id: &str, apply: bool) -> Result<PlanResult> {
    let project = board
        .project(project_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Project {}", project_id)))?;

    let plan = assistant.generate_plan(&project.title, &project.description);
    let created = if apply {
        board.import_plan(project_id, &plan)
    } else {
        Vec::new()
    };

    Ok(PlanResult {
        project_id: project_id.to_string(),
        plan,
        applied: apply,
        created,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResult {
    pub task_id: String,
    pub original: String,
    pub suggestion: String,
    pub applied: bool,
}

impl Output for ImproveResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.applied {
            format!("Updated description of {}:\n{}", self.task_id, self.suggestion)
        } else {
            self.suggestion.clone()
        }
    }
}

/// Suggest a clearer description for a task, storing it when `apply` is set.
///
/// The placeholder returned without an API key is never stored.
pub fn ai_improve(board: &mut Board, assistant: &Assistant, task_id: &str, apply: bool) -> Result<ImproveResult> {
    let task = require_task(board, task_id)?.clone();
    let suggestion = assistant.improve_description(&task.title, &task.description);

    let applied = apply && assistant.is_enabled() && suggestion != task.description;
    if applied {
        board.set_task_description(task_id, &suggestion);
    }

    Ok(ImproveResult {
        task_id: task_id.to_string(),
        original: task.description,
        suggestion,
        applied,
    })
}
