//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The [`TaskflowConfig`] struct mirroring the file
//! - Conversion to and from KDL documents
//! - Loading and saving at a path
//! - Validation

use crate::Result;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the config file in both the system and data directories.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Upper bound accepted for `auth-delay-ms`.
pub const MAX_AUTH_DELAY_MS: u64 = 60_000;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// auth-delay-ms 0
/// seed-demo-data #false
/// assist-model "gemini-2.0-flash"
/// assist-api-key "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskflowConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Simulated latency for login/register, in milliseconds
    pub auth_delay_ms: Option<u64>,

    /// Whether an empty store is populated with demo data
    pub seed_demo_data: Option<bool>,

    /// Model name used by the writing assistant
    pub assist_model: Option<String>,

    /// API key for the writing assistant (sensitive!)
    pub assist_api_key: Option<String>,
}

impl TaskflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(delay) = self.auth_delay_ms {
            if delay > MAX_AUTH_DELAY_MS {
                return Err(format!(
                    "auth-delay-ms must be at most {}, got {}",
                    MAX_AUTH_DELAY_MS, delay
                ));
            }
        }
        if let Some(ref model) = self.assist_model {
            if model.trim().is_empty() {
                return Err("assist-model must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes and ill-typed values are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        if let Some(node) = doc.get("auth-delay-ms") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    if i >= 0 {
                        config.auth_delay_ms = u64::try_from(i).ok();
                    }
                }
            }
        }

        if let Some(node) = doc.get("seed-demo-data") {
            config.seed_demo_data = node.entries().first().and_then(|e| e.value().as_bool());
        }

        config.assist_model = first_string(doc, "assist-model").map(str::to_string);
        config.assist_api_key = first_string(doc, "assist-api-key")
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            push_node(&mut doc, "output-format", KdlValue::String(format.as_str().to_string()));
        }
        if let Some(delay) = self.auth_delay_ms {
            push_node(&mut doc, "auth-delay-ms", KdlValue::Integer(delay as i128));
        }
        if let Some(seed) = self.seed_demo_data {
            push_node(&mut doc, "seed-demo-data", KdlValue::Bool(seed));
        }
        if let Some(ref model) = self.assist_model {
            push_node(&mut doc, "assist-model", KdlValue::String(model.clone()));
        }
        if let Some(ref key) = self.assist_api_key {
            push_node(&mut doc, "assist-api-key", KdlValue::String(key.clone()));
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &TaskflowConfig) {
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.auth_delay_ms.is_some() {
            self.auth_delay_ms = other.auth_delay_ms;
        }
        if other.seed_demo_data.is_some() {
            self.seed_demo_data = other.seed_demo_data;
        }
        if other.assist_model.is_some() {
            self.assist_model = other.assist_model.clone();
        }
        if other.assist_api_key.is_some() {
            self.assist_api_key = other.assist_api_key.clone();
        }
    }

    /// Load config from a file. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let doc: KdlDocument = content.parse()?;
        let config = Self::from_kdl(&doc);
        config
            .validate()
            .map_err(|e| crate::Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Write config to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_kdl().to_string())?;
        Ok(())
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}
