use super::comment::{CommentView, comment_views};
use super::{Output, json};
use crate::models::{NewTask, Task, TaskStatus, User};
use crate::{Board, Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub task: Task,
}

impl Output for TaskCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created task {} \"{}\" [{}]",
            self.task.id,
            self.task.title,
            self.task.status.label()
        )
    }
}

/// Create a task. The project and assignee must exist.
pub fn task_create(
    board: &mut Board,
    project_id: &str,
    title: &str,
    description: &str,
    status: &str,
    assignee: Option<&str>,
) -> Result<TaskCreated> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Task title cannot be empty".to_string()));
    }
    let status = TaskStatus::parse(status)?;
    require_project(board, project_id)?;

    let mut new_task = NewTask::new(title).description(description).status(status);
    if let Some(user_id) = assignee.filter(|id| !id.is_empty()) {
        require_user(board, user_id)?;
        new_task = new_task.assignee(user_id);
    }

    Ok(TaskCreated {
        task: board.create_task(project_id, new_task),
    })
}

/// A task with its assignee and comment thread.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub task: Task,
    pub assignee: Option<User>,
    pub comments: Vec<CommentView>,
}

impl Output for TaskDetail {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} [{}]", self.task.title, self.task.id),
            format!("  Status:   {}", self.task.status.label()),
            format!(
                "  Assignee: {}",
                self.assignee
                    .as_ref()
                    .map(|u| u.name.as_str())
                    .unwrap_or("Unassigned")
            ),
            format!("  Project:  {}", self.task.project_id),
            format!("  Created:  {}", crate::models::timestamp::format(&self.task.created_at)),
        ];
        if !self.task.description.is_empty() {
            lines.push(String::new());
            lines.push(self.task.description.clone());
        }

        lines.push(String::new());
        lines.push(format!("Comments ({}):", self.comments.len()));
        for view in &self.comments {
            lines.push(format!("  {}", view.human_line()));
        }
        lines.join("\n")
    }
}

pub fn task_show(board: &Board, task_id: &str) -> Result<TaskDetail> {
    let task = require_task(board, task_id)?.clone();
    Ok(TaskDetail {
        assignee: board.assignee_for_task(&task),
        comments: comment_views(board, task_id),
        task,
    })
}

/// Result of a single-field task update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdated {
    pub field: &'static str,
    pub task: Task,
}

impl Output for TaskUpdated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match self.field {
            "status" => format!("Moved {} to {}", self.task.id, self.task.status.label()),
            "assignee" => match self.task.assignee_id {
                Some(ref user_id) => format!("Assigned {} to {}", self.task.id, user_id),
                None => format!("Unassigned {}", self.task.id),
            },
            _ => format!("Updated {} of {}", self.field, self.task.id),
        }
    }
}

pub fn task_status(board: &mut Board, task_id: &str, status: &str) -> Result<TaskUpdated> {
    let status = TaskStatus::parse(status)?;
    if !board.set_task_status(task_id, status) {
        return Err(task_not_found(task_id));
    }
    updated(board, task_id, "status")
}

/// Assign a task; `None` clears the assignee.
pub fn task_assign(board: &mut Board, task_id: &str, user_id: Option<&str>) -> Result<TaskUpdated> {
    let user_id = user_id.unwrap_or("");
    if !user_id.is_empty() {
        require_user(board, user_id)?;
    }
    if !board.set_task_assignee(task_id, user_id) {
        return Err(task_not_found(task_id));
    }
    updated(board, task_id, "assignee")
}

pub fn task_describe(board: &mut Board, task_id: &str, text: &str) -> Result<TaskUpdated> {
    if !board.set_task_description(task_id, text) {
        return Err(task_not_found(task_id));
    }
    updated(board, task_id, "description")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeleted {
    pub id: String,
    /// Comments left behind on the deleted task
    pub remaining_comments: usize,
}

impl Output for TaskDeleted {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted task {}", self.id)
    }
}

pub fn task_delete(board: &mut Board, task_id: &str) -> Result<TaskDeleted> {
    if !board.delete_task(task_id) {
        return Err(task_not_found(task_id));
    }
    Ok(TaskDeleted {
        id: task_id.to_string(),
        remaining_comments: board.comment_count_for_task(task_id),
    })
}

fn updated(board: &Board, task_id: &str, field: &'static str) -> Result<TaskUpdated> {
    let task = require_task(board, task_id)?.clone();
    Ok(TaskUpdated { field, task })
}

pub(super) fn require_task<'a>(board: &'a Board, task_id: &str) -> Result<&'a Task> {
    board.task(task_id).ok_or_else(|| task_not_found(task_id))
}

fn require_project(board: &Board, project_id: &str) -> Result<()> {
    match board.project(project_id) {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(format!("Project {}", project_id))),
    }
}

fn require_user(board: &Board, user_id: &str) -> Result<()> {
    match board.user(user_id) {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(format!("User {}", user_id))),
    }
}

fn task_not_found(task_id: &str) -> Error {
    Error::NotFound(format!("Task {}", task_id))
}
