//! The plugin capability and the template-driven base implementation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PluginError, TemplateKind};
use crate::prompt::Prompter;
use crate::render::{build_context, output_path, render, write_manifest};
use crate::value::{text_value, PluginValues};
use crate::variable::{validate_values, Variable};

/// One configured use of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInstanceConfig {
    pub plugin_name: String,
    #[serde(default)]
    pub values: PluginValues,
}

impl PluginInstanceConfig {
    pub fn new(plugin_name: &str, values: PluginValues) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            values,
        }
    }
}

/// A named generator of manifests.
///
/// Implementors hand out a [`BasePlugin`] and override only what differs;
/// every provided method delegates to it.
pub trait Plugin: Send + Sync {
    fn base(&self) -> &BasePlugin;

    fn name(&self) -> &str {
        self.base().name()
    }

    fn description(&self) -> &str {
        self.base().description()
    }

    fn variables(&self) -> &[Variable] {
        self.base().variables()
    }

    /// Body template.
    fn template(&self) -> &str {
        self.base().template()
    }

    /// Output path template, relative to the output root.
    fn file_path(&self) -> &str {
        self.base().file_path()
    }

    fn validate(&self, values: &PluginValues) -> Result<(), PluginError> {
        self.base().validate(values)
    }

    /// Write this instance's manifests under `output_root` and return their
    /// paths relative to it. Assumes `validate` already passed.
    fn generate_file(
        &self,
        values: &PluginValues,
        output_root: &Path,
        namespace: &str,
    ) -> Result<Vec<PathBuf>, PluginError> {
        self.base().generate_file(values, output_root, namespace)
    }

    /// Known candidates for a text variable, given the answers so far.
    fn suggestions(
        &self,
        _variable: &str,
        _values: &PluginValues,
        _namespace: &str,
    ) -> Option<Vec<String>> {
        None
    }

    /// Short identifier of one instance for menus and summaries.
    fn instance_label(&self, values: &PluginValues) -> String {
        text_value(values, "name")
            .filter(|s| !s.is_empty())
            .unwrap_or("configured")
            .to_string()
    }

    fn as_custom_config(&self) -> Option<&dyn CustomConfigPlugin> {
        None
    }
}

/// Plugins that ask further questions after the generic variable form.
pub trait CustomConfigPlugin: Plugin {
    /// Run the extra steps, writing results into `values`.
    fn collect_custom_config(
        &self,
        values: &mut PluginValues,
        prompter: &mut dyn Prompter,
    ) -> Result<()>;
}

/// Schema plus a path template and a body template: one file per instance.
#[derive(Debug, Clone)]
pub struct BasePlugin {
    name: String,
    description: String,
    variables: Vec<Variable>,
    template: String,
    file_path: String,
}

impl BasePlugin {
    pub fn new(
        name: &str,
        description: &str,
        variables: Vec<Variable>,
        template: &str,
        file_path: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            variables,
            template: template.to_string(),
            file_path: file_path.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn validate(&self, values: &PluginValues) -> Result<(), PluginError> {
        debug!(plugin = %self.name, "Validating plugin values");
        validate_values(&self.name, &self.variables, values)
    }

    pub fn generate_file(
        &self,
        values: &PluginValues,
        output_root: &Path,
        namespace: &str,
    ) -> Result<Vec<PathBuf>, PluginError> {
        let context = build_context(&self.variables, values, namespace);

        let rendered = render(&self.name, TemplateKind::Path, &self.file_path, &context)?;
        let relative = output_path(&self.name, &rendered)?;
        let body = render(&self.name, TemplateKind::Body, &self.template, &context)?;

        write_manifest(&self.name, &output_root.join(&relative), &body)?;

        info!(plugin = %self.name, path = %relative.display(), "Generated plugin file");
        Ok(vec![relative])
    }
}

impl Plugin for BasePlugin {
    fn base(&self) -> &BasePlugin {
        self
    }
}
