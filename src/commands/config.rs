use super::{Output, json};
use crate::Result;
use crate::config::{ResolvedSettings, ValueSource};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigShow {
    pub data_dir: PathBuf,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
    /// Masked key, never the full value
    pub assist_api_key: Option<String>,
    pub assist_api_key_source: Option<ValueSource>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.settings;
        let key = match (&self.assist_api_key, &self.assist_api_key_source) {
            (Some(masked), Some(source)) => format!("{} ({})", masked, source),
            _ => "not set".to_string(),
        };
        [
            format!("data-dir        {}", self.data_dir.display()),
            format!("output-format   {} ({})", s.output_format.value, s.output_format.source),
            format!("auth-delay-ms   {} ({})", s.auth_delay_ms.value, s.auth_delay_ms.source),
            format!("seed-demo-data  {} ({})", s.seed_demo_data.value, s.seed_demo_data.source),
            format!("assist-model    {} ({})", s.assist.model(), s.assist.model.source),
            format!("assist-api-key  {}", key),
        ]
        .join("\n")
    }
}

pub fn config_show(data_dir: &Path, settings: &ResolvedSettings) -> Result<ConfigShow> {
    Ok(ConfigShow {
        data_dir: data_dir.to_path_buf(),
        assist_api_key: settings.assist.masked_api_key(),
        assist_api_key_source: settings.assist.api_key_source().cloned(),
        settings: settings.clone(),
    })
}
