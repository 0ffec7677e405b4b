//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`TASKFLOW_API_KEY` for the assist key)
//! 3. Data-dir config.kdl (`<data dir>/config.kdl`)
//! 4. System config.kdl (`~/.config/taskflow/config.kdl`)
//! 5. Built-in defaults

use crate::Result;
use crate::board::{BoardConfig, DEFAULT_AUTH_DELAY};
use crate::config::schema::{CONFIG_FILE_NAME, OutputFormat, TaskflowConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the assist API key.
pub const API_KEY_ENV: &str = "TASKFLOW_API_KEY";

/// Model used by the writing assistant when none is configured.
pub const DEFAULT_ASSIST_MODEL: &str = "gemini-2.0-flash";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the data directory's config.kdl
    DataDir,
    /// Value from the system config.kdl
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::DataDir => write!(f, "data-dir"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Where config files are looked up.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// `~/.config/taskflow/config.kdl`
    pub system: Option<PathBuf>,
    /// `<data dir>/config.kdl`
    pub data_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// System config plus the config inside `data_dir`.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self {
            system: Self::system_config_path(),
            data_dir: Some(data_dir.join(CONFIG_FILE_NAME)),
        }
    }

    /// Only the config inside `data_dir`; the system file is ignored.
    pub fn data_dir_only(data_dir: &Path) -> Self {
        Self {
            system: None,
            data_dir: Some(data_dir.join(CONFIG_FILE_NAME)),
        }
    }

    pub fn system_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("taskflow").join(CONFIG_FILE_NAME))
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub auth_delay_ms: Option<u64>,
    pub seed_demo_data: Option<bool>,
    pub assist_model: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_auth_delay_ms(mut self, delay: u64) -> Self {
        self.auth_delay_ms = Some(delay);
        self
    }

    pub fn with_seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = Some(seed);
        self
    }

    pub fn with_assist_model(mut self, model: impl Into<String>) -> Self {
        self.assist_model = Some(model.into());
        self
    }
}

/// Resolved settings for the writing assistant.
#[derive(Debug, Clone, Serialize)]
pub struct AssistSettings {
    pub model: Resolved<String>,
    #[serde(skip)]
    pub api_key: Option<Resolved<String>>,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            model: Resolved::new(DEFAULT_ASSIST_MODEL.to_string(), ValueSource::Default),
            api_key: None,
        }
    }
}

impl AssistSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|r| r.value.as_str())
    }

    pub fn model(&self) -> &str {
        &self.model.value
    }

    pub fn api_key_source(&self) -> Option<&ValueSource> {
        self.api_key.as_ref().map(|r| &r.source)
    }

    /// The key with all but the first and last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let prefix: String = chars.iter().take(4).collect();
            if chars.len() <= 12 {
                format!("{}...", prefix)
            } else {
                let suffix: String = chars[chars.len() - 4..].iter().collect();
                format!("{}...{}", prefix, suffix)
            }
        })
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSettings {
    pub output_format: Resolved<OutputFormat>,
    pub auth_delay_ms: Resolved<u64>,
    pub seed_demo_data: Resolved<bool>,
    pub assist: AssistSettings,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            auth_delay_ms: Resolved::new(DEFAULT_AUTH_DELAY.as_millis() as u64, ValueSource::Default),
            seed_demo_data: Resolved::new(true, ValueSource::Default),
            assist: AssistSettings::default(),
        }
    }
}

impl ResolvedSettings {
    /// Read config files and the environment, then apply `overrides`.
    pub fn resolve(paths: &ConfigPaths, overrides: &ConfigOverrides) -> Result<Self> {
        let system = match paths.system {
            Some(ref path) => TaskflowConfig::load(path)?,
            None => TaskflowConfig::new(),
        };
        let data_dir = match paths.data_dir {
            Some(ref path) => TaskflowConfig::load(path)?,
            None => TaskflowConfig::new(),
        };
        let env_key = std::env::var(API_KEY_ENV).ok();

        Ok(resolve_layers(&system, &data_dir, env_key, overrides))
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    /// Board behaviour derived from these settings.
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig::default()
            .with_auth_delay(Duration::from_millis(self.auth_delay_ms.value))
            .with_seed_demo_data(self.seed_demo_data.value)
    }
}

/// Pick the highest-precedence value present across the layers.
fn pick<T: Clone>(
    cli: Option<&T>,
    data_dir: Option<&T>,
    system: Option<&T>,
) -> Option<Resolved<T>> {
    if let Some(v) = cli {
        Some(Resolved::new(v.clone(), ValueSource::CliFlag))
    } else if let Some(v) = data_dir {
        Some(Resolved::new(v.clone(), ValueSource::DataDir))
    } else {
        system.map(|v| Resolved::new(v.clone(), ValueSource::System))
    }
}

fn resolve_layers(
    system: &TaskflowConfig,
    data_dir: &TaskflowConfig,
    env_key: Option<String>,
    overrides: &ConfigOverrides,
) -> ResolvedSettings {
    let mut result = ResolvedSettings::default();

    if let Some(r) = pick(
        overrides.output_format.as_ref(),
        data_dir.output_format.as_ref(),
        system.output_format.as_ref(),
    ) {
        result.output_format = r;
    }

    if let Some(r) = pick(
        overrides.auth_delay_ms.as_ref(),
        data_dir.auth_delay_ms.as_ref(),
        system.auth_delay_ms.as_ref(),
    ) {
        result.auth_delay_ms = r;
    }

    if let Some(r) = pick(
        overrides.seed_demo_data.as_ref(),
        data_dir.seed_demo_data.as_ref(),
        system.seed_demo_data.as_ref(),
    ) {
        result.seed_demo_data = r;
    }

    if let Some(r) = pick(
        overrides.assist_model.as_ref(),
        data_dir.assist_model.as_ref(),
        system.assist_model.as_ref(),
    ) {
        result.assist.model = r;
    }

    // The key has no CLI flag; the environment sits above the files.
    result.assist.api_key = match env_key.filter(|k| !k.is_empty()) {
        Some(key) => Some(Resolved::new(key, ValueSource::EnvVar(API_KEY_ENV.to_string()))),
        None => pick(None, data_dir.assist_api_key.as_ref(), system.assist_api_key.as_ref()),
    };

    result
}
