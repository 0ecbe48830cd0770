use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use flux_plugin::PluginInstanceConfig;

use crate::error::ConfigError;

pub const DEFAULT_INTERVAL: &str = "5m";

// RFC 1123 label: usable as a Kubernetes name and as a single path segment.
const NAME_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("valid name pattern"))
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

/// Everything needed to generate one application directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub namespace: String,
    pub helm_repo_name: String,
    pub helm_repo_url: String,
    pub chart_name: String,
    pub chart_version: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Raw Helm values YAML, written verbatim to the values file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(default)]
    pub plugins: Vec<PluginInstanceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            namespace: String::new(),
            helm_repo_name: String::new(),
            helm_repo_url: String::new(),
            chart_name: String::new(),
            chart_version: String::new(),
            interval: default_interval(),
            values: None,
            plugins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), plugins = config.plugins.len(), "Loaded app config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        fs::write(path, yaml).map_err(write_error)?;

        debug!(path = %path.display(), "Saved app config");
        Ok(())
    }

    /// Check required fields and name formats.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("app_name", &self.app_name),
            ("namespace", &self.namespace),
            ("helm_repo_name", &self.helm_repo_name),
            ("helm_repo_url", &self.helm_repo_url),
            ("chart_name", &self.chart_name),
            ("chart_version", &self.chart_version),
            ("interval", &self.interval),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }

        for (field, value) in [
            ("app_name", &self.app_name),
            ("namespace", &self.namespace),
            ("helm_repo_name", &self.helm_repo_name),
        ] {
            if !name_regex().is_match(value) {
                return Err(ConfigError::InvalidName {
                    field,
                    value: value.clone(),
                });
            }
        }

        if let Some(index) = self.plugins.iter().position(|p| p.plugin_name.is_empty()) {
            return Err(ConfigError::MissingPluginName { index });
        }
        Ok(())
    }

    /// Directory the application is generated into.
    pub fn app_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.app_name)
    }

    pub fn add_plugin(&mut self, instance: PluginInstanceConfig) {
        self.plugins.push(instance);
    }
}
