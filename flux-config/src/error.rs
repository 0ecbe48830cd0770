use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("failed to write config file '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize config")]
    Serialize(#[from] serde_yaml_ng::Error),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}': must be lowercase alphanumeric characters or '-', starting and ending with an alphanumeric character")]
    InvalidName { field: &'static str, value: String },

    #[error("plugin instance {index} has no plugin name")]
    MissingPluginName { index: usize },
}
