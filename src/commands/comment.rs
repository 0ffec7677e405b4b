use super::task::require_task;
use super::{Output, json};
use crate::models::{Comment, timestamp};
use crate::{Board, Error, Result};
use serde::Serialize;

/// A comment with its author's display name resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author_name: Option<String>,
}

impl CommentView {
    pub(super) fn human_line(&self) -> String {
        format!(
            "{} {}: {}",
            timestamp::format(&self.comment.created_at),
            self.author_name.as_deref().unwrap_or(&self.comment.user_id),
            self.comment.text
        )
    }
}

pub(super) fn comment_views(board: &Board, task_id: &str) -> Vec<CommentView> {
    board
        .comments_for_task(task_id)
        .into_iter()
        .map(|comment| CommentView {
            author_name: board.comment_author(comment).map(|u| u.name),
            comment: comment.clone(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAdded {
    pub comment: Comment,
}

impl Output for CommentAdded {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Added comment {} to {}", self.comment.id, self.comment.task_id)
    }
}

/// Comment on an existing task as the signed-in user.
pub fn comment_add(board: &mut Board, task_id: &str, text: &str) -> Result<CommentAdded> {
    require_task(board, task_id)?;
    match board.add_comment(task_id, text)? {
        Some(comment) => Ok(CommentAdded { comment }),
        None => Err(Error::NotSignedIn),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentList {
    pub task_id: String,
    pub comments: Vec<CommentView>,
    pub count: usize,
}

impl Output for CommentList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.comments.is_empty() {
            return format!("No comments on {}.", self.task_id);
        }
        self.comments
            .iter()
            .map(CommentView::human_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Comments on a task, oldest first. Works for deleted tasks too.
pub fn comment_list(board: &Board, task_id: &str) -> Result<CommentList> {
    let comments = comment_views(board, task_id);
    Ok(CommentList {
        task_id: task_id.to_string(),
        count: comments.len(),
        comments,
    })
}
