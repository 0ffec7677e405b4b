//! Derived views over a board snapshot.
//!
//! Everything here is a pure function of the collections passed in and is
//! recomputed on every call, so a read right after a write always sees it.

use crate::models::{Comment, Project, Task, TaskStatus, User};
use serde::Serialize;

/// Tasks in a project, in insertion order.
pub fn tasks_for_project<'a>(tasks: &'a [Task], project_id: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.project_id == project_id).collect()
}

/// Tasks in a project with the given status, in insertion order.
pub fn tasks_by_status<'a>(
    tasks: &'a [Task],
    project_id: &str,
    status: TaskStatus,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.project_id == project_id && t.status == status)
        .collect()
}

pub fn comment_count_for_task(comments: &[Comment], task_id: &str) -> usize {
    comments.iter().filter(|c| c.task_id == task_id).count()
}

/// Comments on a task, oldest first.
pub fn comments_for_task<'a>(comments: &'a [Comment], task_id: &str) -> Vec<&'a Comment> {
    comments.iter().filter(|c| c.task_id == task_id).collect()
}

/// The assigned user, or `None` when unassigned or the id is unknown.
pub fn assignee_for_task<'a>(users: &'a [User], task: &Task) -> Option<&'a User> {
    let assignee_id = task.assignee_id.as_deref()?;
    user_by_id(users, assignee_id)
}

pub fn comment_author<'a>(users: &'a [User], comment: &Comment) -> Option<&'a User> {
    user_by_id(users, &comment.user_id)
}

pub fn user_by_id<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|u| u.id == id)
}

pub fn project_by_id<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == id)
}

pub fn task_by_id<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn comment_by_id<'a>(comments: &'a [Comment], id: &str) -> Option<&'a Comment> {
    comments.iter().find(|c| c.id == id)
}

/// A task as rendered on a board card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCard {
    #[serde(flatten)]
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    pub comment_count: usize,
}

/// One status column of a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub label: &'static str,
    pub cards: Vec<TaskCard>,
}

/// The three columns of a project board, in To Do / In Progress / Done order.
pub fn board_columns(
    tasks: &[Task],
    comments: &[Comment],
    users: &[User],
    project_id: &str,
) -> Vec<BoardColumn> {
    TaskStatus::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            label: status.label(),
            cards: tasks_by_status(tasks, project_id, status)
                .into_iter()
                .map(|task| TaskCard {
                    task: task.clone(),
                    assignee: assignee_for_task(users, task).cloned(),
                    comment_count: comment_count_for_task(comments, &task.id),
                })
                .collect(),
        })
        .collect()
}
