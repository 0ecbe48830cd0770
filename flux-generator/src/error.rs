use std::io;
use std::path::PathBuf;
use thiserror::Error;

use flux_config::ConfigError;
use flux_plugin::PluginError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to create directory '{}'", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render {template}: {message}")]
    Template {
        template: &'static str,
        message: String,
    },

    #[error("plugin instance {position}: plugin '{name}' not found in registry")]
    PluginNotFound { position: usize, name: String },

    #[error("plugin instance {position} ({plugin} - {label}) failed")]
    Plugin {
        position: usize,
        plugin: String,
        label: String,
        #[source]
        source: PluginError,
    },
}
