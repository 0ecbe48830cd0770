//! Error types for plugin validation, rendering, and registration.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse category of a [`PluginError`], for callers that branch on the
/// failure class instead of matching every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User input does not satisfy the plugin's schema or structural rules.
    Validation,
    /// The plugin's own template is malformed or failed to render.
    Template,
    /// Creating a directory or writing a file failed.
    FileSystem,
    /// Pre-serialized structured input could not be decoded at generation time.
    Decode,
}

/// Which of a plugin's templates failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Path,
    Body,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Path => f.write_str("path"),
            TemplateKind::Body => f.write_str("body"),
        }
    }
}

/// The filesystem operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    CreateDirectory,
    CreateFile,
    WriteFile,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::CreateDirectory => f.write_str("create_directory"),
            FileOperation::CreateFile => f.write_str("create_file"),
            FileOperation::WriteFile => f.write_str("write_file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("validation error in plugin '{plugin}' for variable '{variable}': {message}")]
    Validation {
        plugin: String,
        variable: String,
        message: String,
    },

    #[error("template error in plugin '{plugin}' ({kind}): {message}")]
    Template {
        plugin: String,
        kind: TemplateKind,
        message: String,
    },

    #[error("file error in plugin '{plugin}' during {operation} for path '{}'", .path.display())]
    FileSystem {
        plugin: String,
        operation: FileOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("plugin '{plugin}' failed to decode '{field}': {message}")]
    Decode {
        plugin: String,
        field: String,
        message: String,
    },
}

impl PluginError {
    pub fn validation(
        plugin: impl Into<String>,
        variable: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PluginError::Validation {
            plugin: plugin.into(),
            variable: variable.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginError::Validation { .. } => ErrorKind::Validation,
            PluginError::Template { .. } => ErrorKind::Template,
            PluginError::FileSystem { .. } => ErrorKind::FileSystem,
            PluginError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn plugin(&self) -> &str {
        match self {
            PluginError::Validation { plugin, .. }
            | PluginError::Template { plugin, .. }
            | PluginError::FileSystem { plugin, .. }
            | PluginError::Decode { plugin, .. } => plugin,
        }
    }

    /// The offending variable, for validation failures.
    pub fn variable(&self) -> Option<&str> {
        match self {
            PluginError::Validation { variable, .. } => Some(variable),
            _ => None,
        }
    }
}

/// A plugin's variable schema breaks one of its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("variable #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("variable '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("select variable '{0}' has no options")]
    NoOptions(String),

    #[error("default of select variable '{0}' is not one of its options")]
    DefaultNotAnOption(String),

    #[error("default of variable '{variable}' must be a {expected}")]
    DefaultKindMismatch {
        variable: String,
        expected: &'static str,
    },

    #[error("variable '{0}' declares options but is not a select")]
    UnexpectedOptions(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("plugin name cannot be empty")]
    EmptyName,

    #[error("plugin with name '{0}' is already registered")]
    Duplicate(String),

    #[error("plugin '{plugin}' has an invalid variable schema")]
    InvalidSchema {
        plugin: String,
        #[source]
        source: SchemaError,
    },
}
