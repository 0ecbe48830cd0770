//! flux-plugin
//!
//! Template-driven generators that add resources to a Flux application
//! directory. A [`Plugin`] declares its [`Variable`]s, validates submitted
//! values, and writes one or more manifests; the [`Registry`] looks plugins
//! up by name.

pub mod error;
pub mod form;
pub mod lister;
pub mod plugin;
pub mod plugins;
pub mod prompt;
pub mod registry;
pub mod render;
pub mod value;
pub mod variable;

pub use error::{
    ErrorKind, FileOperation, PluginError, RegistryError, SchemaError, TemplateKind,
};
pub use form::collect_values;
pub use lister::{ClusterLister, StaticLister};
pub use plugin::{BasePlugin, CustomConfigPlugin, Plugin, PluginInstanceConfig};
pub use prompt::{select_value, Answer, Prompter, ScriptedPrompter, TextPrompt};
pub use registry::{Registry, RegistryBuilder};
pub use render::ensure_trailing_newline;
pub use value::{values_from, PluginValues, Value};
pub use variable::{validate_schema, validate_values, SelectOption, Variable, VariableKind};
