//! CLI argument definitions for TaskFlow.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version string with build metadata, shown by `tf --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("TF_GIT_COMMIT"),
    ", built ",
    env!("TF_BUILD_TIMESTAMP"),
    ")"
);

/// TaskFlow - a Kanban task board in your terminal.
///
/// Sign in with `tf auth login`, then create projects and move tasks between
/// the To Do, In Progress and Done columns.
#[derive(Parser, Debug)]
#[command(name = "tf")]
#[command(author, version, long_version = LONG_VERSION, about = "A Kanban task board for small teams", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the board data and its config.kdl.
    /// Defaults to the platform data directory (e.g. ~/.local/share/taskflow).
    #[arg(long = "data-dir", global = true, env = "TF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Do not populate an empty store with demo data
    #[arg(long = "no-seed", global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign out and create accounts
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// List the people tasks can be assigned to
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Comment on tasks
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Writing assistant (needs TASKFLOW_API_KEY or assist-api-key)
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Create an account and sign in
    Register {
        /// Display name
        name: String,
        /// Email address (must be unused)
        email: String,
        /// Password
        password: String,
    },

    /// Sign in with email and password
    Login {
        email: String,
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project owned by the signed-in user
    Create {
        /// Project title
        title: String,

        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all projects
    List,

    /// Show a project's board: To Do, In Progress and Done columns
    Board {
        /// Project ID
        id: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task in a project
    Create {
        /// Project ID
        project: String,

        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Initial status (todo, in_progress, done)
        #[arg(short, long, default_value = "TODO")]
        status: String,

        /// Assignee user ID
        #[arg(short, long)]
        assignee: Option<String>,
    },

    /// Show a task with its comments
    Show {
        /// Task ID
        id: String,
    },

    /// Move a task to another column
    Status {
        /// Task ID
        id: String,
        /// New status (todo, in_progress, done)
        status: String,
    },

    /// Assign a task, or clear the assignee when no user is given
    Assign {
        /// Task ID
        id: String,
        /// User ID
        user: Option<String>,
    },

    /// Replace a task's description
    Describe {
        /// Task ID
        id: String,
        /// New description
        text: String,
    },

    /// Delete a task (its comments are kept)
    Delete {
        /// Task ID
        id: String,
    },
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List all registered users and their IDs
    List,
}

/// Comment subcommands
#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Comment on a task as the signed-in user
    Add {
        /// Task ID
        task: String,
        /// Comment text
        text: String,
    },

    /// List a task's comments, oldest first
    List {
        /// Task ID
        task: String,
    },
}

/// Assistant subcommands
#[derive(Subcommand, Debug)]
pub enum AiCommands {
    /// Suggest starter tasks for a project
    Plan {
        /// Project ID
        project: String,

        /// Create the suggested tasks
        #[arg(long)]
        apply: bool,
    },

    /// Suggest a clearer description for a task
    Improve {
        /// Task ID
        task: String,

        /// Replace the task's description with the suggestion
        #[arg(long)]
        apply: bool,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,
}
