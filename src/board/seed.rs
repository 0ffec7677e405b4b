//! Demo data written to an empty store on first open.

use crate::models::{Comment, Project, Task, TaskStatus, User, UserRecord};
use chrono::{DateTime, Utc};

/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "password123";

pub fn users() -> Vec<UserRecord> {
    vec![
        demo_user(
            "u1",
            "Alice Engineer",
            "alice@tech.com",
            "https://ui-avatars.com/api/?name=Alice+Engineer&background=0D8ABC&color=fff",
        ),
        demo_user(
            "u2",
            "Bob Manager",
            "bob@tech.com",
            "https://ui-avatars.com/api/?name=Bob+Manager&background=random",
        ),
    ]
}

fn demo_user(id: &str, name: &str, email: &str, avatar: &str) -> UserRecord {
    UserRecord {
        user: User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: Some(avatar.to_string()),
        },
        password: DEMO_PASSWORD.to_string(),
    }
}

pub fn projects(now: DateTime<Utc>) -> Vec<Project> {
    vec![Project {
        id: "p1".to_string(),
        title: "Website Redesign".to_string(),
        description: "Overhaul the company homepage with new branding.".to_string(),
        owner_id: "u2".to_string(),
        created_at: now,
    }]
}

pub fn tasks(now: DateTime<Utc>) -> Vec<Task> {
    let task = |id: &str, title: &str, description: &str, status: TaskStatus, assignee: &str| Task {
        id: id.to_string(),
        project_id: "p1".to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        assignee_id: Some(assignee.to_string()),
        created_at: now,
    };

    vec![
        task(
            "t1",
            "Setup React Repo",
            "Initialize project with Vite and Tailwind.",
            TaskStatus::Done,
            "u1",
        ),
        task(
            "t2",
            "Design Homepage",
            "Create Figma mockups for the landing page.",
            TaskStatus::InProgress,
            "u2",
        ),
        task(
            "t3",
            "Implement Header",
            "Build responsive header component.",
            TaskStatus::Todo,
            "u1",
        ),
    ]
}

pub fn comments(now: DateTime<Utc>) -> Vec<Comment> {
    vec![Comment {
        id: "c1".to_string(),
        task_id: "t2".to_string(),
        user_id: "u2".to_string(),
        text: "Make sure to use the new logo assets.".to_string(),
        created_at: now,
    }]
}
