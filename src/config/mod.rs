//! Configuration for TaskFlow.
//!
//! ## config.kdl
//!
//! Located at:
//! - System: `~/.config/taskflow/config.kdl`
//! - Data dir: `<data dir>/config.kdl` (see [`crate::storage::get_data_dir`])
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `auth-delay-ms` - simulated login/register latency
//! - `seed-demo-data` - populate an empty store with demo data
//! - `assist-model` - model name for the writing assistant
//! - `assist-api-key` - API key for the writing assistant
//!
//! ## Precedence
//!
//! CLI flag > environment > data-dir config > system config > defaults.
//! Use the [`resolver`] module for resolution with source tracking.

pub mod resolver;
pub mod schema;

pub use resolver::{
    API_KEY_ENV, AssistSettings, ConfigOverrides, ConfigPaths, DEFAULT_ASSIST_MODEL, Resolved,
    ResolvedSettings, ValueSource,
};
pub use schema::{CONFIG_FILE_NAME, OutputFormat, TaskflowConfig};
