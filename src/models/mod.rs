//! Data models for TaskFlow entities.
//!
//! This module defines the core data structures:
//! - `User` - The session-facing user (never carries a credential)
//! - `UserRecord` - A directory entry: a `User` plus its password credential
//! - `Project` - A board owned by the user who created it
//! - `Task` - A card on a project board, in one of three status columns
//! - `Comment` - An immutable note left on a task by a user
//!
//! Field names serialize in camelCase so stored entries keep the same JSON
//! shape as the browser build of TaskFlow.

pub mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Task status, one per board column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire representation (`TODO`, `IN_PROGRESS`, `DONE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Column heading shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Parse a status, case-insensitive, accepting `-` or `_` separators.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "todo" | "to_do" | "to-do" => Ok(TaskStatus::Todo),
            "in_progress" | "in-progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(Error::InvalidInput(format!("Invalid status: {}", s))),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user as seen by the session and by views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Login email, unique across the directory
    pub email: String,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A user directory entry, including the password credential.
///
/// Only the directory stores these. Everything handed to the session or to
/// views goes through [`UserRecord::to_user`], which drops the credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,

    /// Password credential (stored as entered)
    pub password: String,
}

impl UserRecord {
    /// Build a new directory entry with a generated avatar URL.
    pub fn new(id: String, name: String, email: String, password: String) -> Self {
        let avatar = Some(avatar_url(&name));
        Self {
            user: User {
                id,
                name,
                email,
                avatar,
            },
            password,
        }
    }

    /// Credential-stripped copy for the session.
    pub fn to_user(&self) -> User {
        self.user.clone()
    }

    /// Exact, case-sensitive comparison of both email and password.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.user.email == email && self.password == password
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Avatar URL derived from a display name.
pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(name)
    )
}

/// A project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Project title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// User who created the project
    pub owner_id: String,

    /// Creation timestamp
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A card on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Owning project; never changes after creation
    pub project_id: String,

    /// Task title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Current column
    #[serde(default)]
    pub status: TaskStatus,

    /// Assigned user, `None` when unassigned
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub assignee_id: Option<String>,

    /// Creation timestamp
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn assignee(mut self, assignee_id: impl Into<String>) -> Self {
        let id = assignee_id.into();
        self.assignee_id = if id.is_empty() { None } else { Some(id) };
        self
    }
}

/// A note on a task. Comments are never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier
    pub id: String,

    /// Task the comment belongs to
    pub task_id: String,

    /// Author
    pub user_id: String,

    /// Comment body
    pub text: String,

    /// Creation timestamp
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A task suggested by the assistant, not yet on any board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl PlannedTask {
    pub fn new(title: &str, description: &str, status: TaskStatus) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            status,
        }
    }
}

impl From<&PlannedTask> for NewTask {
    fn from(planned: &PlannedTask) -> Self {
        NewTask::new(planned.title.clone())
            .description(planned.description.clone())
            .status(planned.status)
    }
}

/// Stored data may carry an unassigned task as `"assigneeId": ""`.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t1".to_string(),
            project_id: "p1".to_string(),
            title: "Setup repo".to_string(),
            description: String::new(),
            status: TaskStatus::InProgress,
            assignee_id: Some("u1".to_string()),
            created_at: timestamp::now(),
        }
    }

    #[test]
    fn test_task_status_serialization() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""IN_PROGRESS""#);
        let status: TaskStatus = serde_json::from_str(r#""DONE""#).unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_task_status_parse() {
        assert_eq!(TaskStatus::parse("todo").unwrap(), TaskStatus::Todo);
        assert_eq!(TaskStatus::parse("IN_PROGRESS").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("in-progress").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("Done").unwrap(), TaskStatus::Done);
        assert!(matches!(TaskStatus::parse("blocked"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_task_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["assigneeId"], "u1");
        assert_eq!(json["status"], "IN_PROGRESS");
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_unassigned_task_omits_assignee() {
        let mut task = sample_task();
        task.assignee_id = None;
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("assigneeId").is_none());
    }

    #[test]
    fn test_empty_assignee_reads_as_unassigned() {
        let json = r#"{"id":"t1","projectId":"p1","title":"A","description":"","status":"TODO","assigneeId":"","createdAt":"2026-01-01T00:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.assignee_id, None);
    }

    #[test]
    fn test_user_record_flattens_credential() {
        let record = UserRecord::new(
            "u9".to_string(),
            "Carol".to_string(),
            "carol@x.com".to_string(),
            "secret1".to_string(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "u9");
        assert_eq!(json["password"], "secret1");

        let user_json = serde_json::to_value(record.to_user()).unwrap();
        assert!(user_json.get("password").is_none());
    }

    #[test]
    fn test_session_user_ignores_stray_credential() {
        let json = r#"{"id":"u1","name":"A","email":"a@x.com","password":"leak"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("password").is_none());
    }

    #[test]
    fn test_user_record_debug_redacts_password() {
        let record = UserRecord::new(
            "u1".to_string(),
            "A".to_string(),
            "a@x.com".to_string(),
            "hunter2".to_string(),
        );
        let debug = format!("{:?}", record);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_credentials_match_is_case_sensitive() {
        let record = UserRecord::new(
            "u1".to_string(),
            "A".to_string(),
            "a@x.com".to_string(),
            "pw".to_string(),
        );
        assert!(record.matches("a@x.com", "pw"));
        assert!(!record.matches("A@x.com", "pw"));
        assert!(!record.matches("a@x.com", "PW"));
    }

    #[test]
    fn test_avatar_url_encodes_name() {
        assert_eq!(
            avatar_url("Alice Engineer"),
            "https://ui-avatars.com/api/?name=Alice%20Engineer&background=random"
        );
    }

    #[test]
    fn test_new_task_empty_assignee_is_unassigned() {
        let new_task = NewTask::new("A").assignee("");
        assert_eq!(new_task.assignee_id, None);
    }
}
