//! Variable schema: the declared inputs of a plugin and their validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{PluginError, SchemaError};
use crate::value::{PluginValues, Value};

/// Input kind of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Text,
    #[serde(alias = "bool", alias = "checkbox")]
    Boolean,
    Select,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Text => "text",
            VariableKind::Boolean => "boolean",
            VariableKind::Select => "select",
        }
    }
}

/// One allowed choice of a select variable. Acceptance compares `value`;
/// `label` is display text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A configurable input declared by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl Variable {
    fn new(name: &str, kind: VariableKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: false,
            default: None,
            options: Vec::new(),
        }
    }

    pub fn text(name: &str, description: &str) -> Self {
        Self::new(name, VariableKind::Text, description)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, VariableKind::Boolean, description)
    }

    /// A select over `(label, value)` pairs with textual values.
    pub fn select<'a>(
        name: &str,
        description: &str,
        options: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut variable = Self::new(name, VariableKind::Select, description);
        variable.options = options
            .into_iter()
            .map(|(label, value)| SelectOption::new(label, value))
            .collect();
        variable
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Position of the option whose value equals `value`.
    pub fn option_index(&self, value: &Value) -> Option<usize> {
        self.options.iter().position(|o| &o.value == value)
    }

    /// Type-check a present, non-null value.
    fn check_value(&self, plugin: &str, value: &Value) -> Result<(), PluginError> {
        match self.kind {
            VariableKind::Boolean if value.as_bool().is_none() => Err(PluginError::validation(
                plugin,
                &self.name,
                "value must be a boolean",
            )),
            VariableKind::Text if value.as_str().is_none() => Err(PluginError::validation(
                plugin,
                &self.name,
                "value must be a string",
            )),
            VariableKind::Select if self.option_index(value).is_none() => {
                Err(PluginError::validation(
                    plugin,
                    &self.name,
                    "value is not one of the allowed options",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Check `values` against the declared `variables`.
///
/// Variables are walked in declaration order and the first failure wins.
/// Keys that no variable declares are ignored.
pub fn validate_values(
    plugin: &str,
    variables: &[Variable],
    values: &PluginValues,
) -> Result<(), PluginError> {
    for variable in variables {
        match values.get(&variable.name) {
            None if variable.required => {
                return Err(PluginError::validation(
                    plugin,
                    &variable.name,
                    "required variable is missing",
                ));
            }
            Some(value) if !value.is_null() => variable.check_value(plugin, value)?,
            _ => {}
        }
    }
    Ok(())
}

/// Check the schema invariants of a variable list.
pub fn validate_schema(variables: &[Variable]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for (index, variable) in variables.iter().enumerate() {
        if variable.name.is_empty() {
            return Err(SchemaError::EmptyName { index });
        }
        if !seen.insert(variable.name.as_str()) {
            return Err(SchemaError::DuplicateName(variable.name.clone()));
        }

        match variable.kind {
            VariableKind::Select => {
                if variable.options.is_empty() {
                    return Err(SchemaError::NoOptions(variable.name.clone()));
                }
                if let Some(default) = &variable.default {
                    if variable.option_index(default).is_none() {
                        return Err(SchemaError::DefaultNotAnOption(variable.name.clone()));
                    }
                }
            }
            VariableKind::Text | VariableKind::Boolean => {
                if !variable.options.is_empty() {
                    return Err(SchemaError::UnexpectedOptions(variable.name.clone()));
                }
                let expected = match variable.kind {
                    VariableKind::Boolean => "boolean",
                    _ => "string",
                };
                if let Some(default) = &variable.default {
                    if !default.is_null() && default.type_name() != expected {
                        return Err(SchemaError::DefaultKindMismatch {
                            variable: variable.name.clone(),
                            expected,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
