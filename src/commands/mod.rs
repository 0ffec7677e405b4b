//! Command implementations for the TaskFlow CLI.
//!
//! Each command takes the opened [`Board`](crate::Board) and returns a result
//! struct implementing [`Output`]. Commands are grouped by entity:
//! - `auth` - register, login, logout, whoami
//! - `project` - project CRUD and the board view
//! - `task` - task CRUD
//! - `comment` - comments on tasks
//! - `user` - the user directory
//! - `ai` - writing assistant
//! - `config` - resolved configuration

mod ai;
mod auth;
mod comment;
mod config;
mod project;
mod task;
mod user;

pub use ai::{PlanResult, ImproveResult, ai_improve, ai_plan};
pub use auth::{AuthResult, LogoutResult, WhoamiResult, auth_login, auth_logout, auth_register, auth_whoami};
pub use comment::{CommentAdded, CommentList, CommentView, comment_add, comment_list};
pub use config::{ConfigShow, config_show};
pub use project::{BoardView, ProjectCreated, ProjectList, ProjectSummary, project_board, project_create, project_list};
pub use task::{
    TaskCreated, TaskDeleted, TaskDetail, TaskUpdated, task_assign, task_create, task_delete,
    task_describe, task_show, task_status,
};
pub use user::{UserList, user_list};

use crate::models::User;
use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize a result for `to_json`. Results are plain data, so this does not fail in practice.
fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// `Name <email> [id]`
fn describe_user(user: &User) -> String {
    format!("{} <{}> [{}]", user.name, user.email, user.id)
}
