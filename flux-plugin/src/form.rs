//! Generic single-screen form built from a plugin's variable schema.

use anyhow::{Context, Result};
use tracing::debug;

use flux_messages::{msg, MESSAGES};

use crate::plugin::Plugin;
use crate::prompt::{Prompter, TextPrompt};
use crate::value::{PluginValues, Value};
use crate::variable::{Variable, VariableKind};

/// Ask for every declared variable of `plugin`, then run its custom
/// configuration steps if it has any.
///
/// Text variables with cluster suggestions become a selection with a manual
/// entry escape. Empty answers to optional text variables are left out so
/// declared defaults apply at render time.
pub fn collect_values(
    plugin: &dyn Plugin,
    prompter: &mut dyn Prompter,
    namespace: &str,
) -> Result<PluginValues> {
    prompter.section(&msg!(MESSAGES.plugin.configure_title, name = plugin.name()));

    let mut values = PluginValues::new();
    for variable in plugin.variables() {
        let value = match variable.kind {
            VariableKind::Text => ask_text(plugin, variable, &values, prompter, namespace)?,
            VariableKind::Boolean => {
                let default = variable
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let answer = prompter.confirm(&variable.name, &variable.description, default)?;
                Some(Value::Bool(answer))
            }
            VariableKind::Select => Some(ask_select(variable, prompter)?),
        };

        if let Some(value) = value {
            values.insert(variable.name.clone(), value);
        }
    }

    if let Some(custom) = plugin.as_custom_config() {
        debug!(plugin = plugin.name(), "Running custom configuration");
        custom.collect_custom_config(&mut values, prompter)?;
    }

    Ok(values)
}

fn ask_text(
    plugin: &dyn Plugin,
    variable: &Variable,
    values: &PluginValues,
    prompter: &mut dyn Prompter,
    namespace: &str,
) -> Result<Option<Value>> {
    let default = variable.default.as_ref().and_then(Value::as_str);

    if let Some(mut suggestions) = plugin.suggestions(&variable.name, values, namespace) {
        let default_index = default
            .and_then(|d| suggestions.iter().position(|s| s == d))
            .unwrap_or(0);
        let manual = suggestions.len();

        let mut items = suggestions.clone();
        items.push(MESSAGES.plugin.manual_entry.to_string());

        let index = prompter.select(&variable.name, &variable.description, &items, default_index)?;
        if index < manual {
            return Ok(Some(Value::Text(suggestions.swap_remove(index))));
        }
    }

    let mut prompt = TextPrompt::new(&variable.name, &variable.description);
    if let Some(default) = default {
        prompt = prompt.default_value(default);
    }
    if variable.required {
        prompt = prompt.required();
    }

    let answer = prompter.input(&prompt)?;
    if answer.is_empty() && !variable.required {
        return Ok(None);
    }
    Ok(Some(Value::Text(answer)))
}

fn ask_select(variable: &Variable, prompter: &mut dyn Prompter) -> Result<Value> {
    let labels: Vec<String> = variable.options.iter().map(|o| o.label.clone()).collect();
    let default_index = variable
        .default
        .as_ref()
        .and_then(|d| variable.option_index(d))
        .unwrap_or(0);

    let index = prompter.select(&variable.name, &variable.description, &labels, default_index)?;
    variable
        .options
        .get(index)
        .map(|o| o.value.clone())
        .with_context(|| format!("invalid selection {} for '{}'", index, variable.name))
}
