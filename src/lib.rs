//! TaskFlow - a single-session Kanban task board.
//!
//! This library provides the core functionality for the `tf` CLI tool:
//! authentication against a local user directory, projects, tasks in status
//! columns, comments, derived board views and an optional writing assistant.
//! All state lives in a local key-value store.

pub mod assist;
pub mod auth;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;
pub mod views;

pub use board::{Board, BoardConfig};


/// Library-level error type for TaskFlow operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] kdl::KdlError),

    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error("Not signed in: run `tf auth login` first")]
    NotSignedIn,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage quota exceeded writing {key} (limit {limit} bytes)")]
    QuotaExceeded { key: String, limit: usize },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for TaskFlow operations.
pub type Result<T> = std::result::Result<T, Error>;
