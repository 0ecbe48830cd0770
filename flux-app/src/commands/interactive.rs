// Interactive collection of an application config

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use flux_config::{AppConfig, DEFAULT_INTERVAL};
use flux_messages::{msg, MESSAGES};
use flux_plugin::{
    collect_values, select_value, ClusterLister, Plugin, PluginInstanceConfig, Prompter, Registry,
    TextPrompt,
};

const DEFAULT_NAMESPACE: &str = "default";

const SYNC_INTERVALS: [(&str, &str); 5] = [
    ("1 minute", "1m"),
    ("5 minutes", "5m"),
    ("10 minutes", "10m"),
    ("30 minutes", "30m"),
    ("1 hour", "1h"),
];

/// Ask every question of a generation run and return the finished config.
///
/// With a `lister`, the namespace question offers the cluster's namespaces.
pub fn collect_app_config(
    prompter: &mut dyn Prompter,
    registry: &Registry,
    lister: Option<&dyn ClusterLister>,
) -> Result<AppConfig> {
    println!("{}", MESSAGES.common.banner);

    let mut config = AppConfig::default();

    prompter.section(MESSAGES.common.app_config_title);
    config.app_name = ask_required(prompter, "Application Name", "Name of the application", None)?;
    config.namespace = ask_namespace(prompter, lister)?;
    config.helm_repo_name = ask_required(
        prompter,
        "Helm Repository Name",
        "Name for the HelmRepository resource",
        None,
    )?;
    config.helm_repo_url = ask_required(
        prompter,
        "Helm Repository URL",
        "URL of the Helm chart repository",
        None,
    )?;
    config.chart_name = ask_required(prompter, "Chart Name", "Helm chart to deploy", None)?;
    config.chart_version = ask_required(prompter, "Chart Version", "Chart version to pin", None)?;

    prompter.section(MESSAGES.common.settings_title);
    config.interval = select_value(
        prompter,
        "Sync Interval",
        "How often Flux reconciles the release",
        &SYNC_INTERVALS,
        DEFAULT_INTERVAL,
    )?;

    let values_path = prompter.input(&TextPrompt::new(
        "Values File",
        "Path to a Helm values file (leave empty for none)",
    ))?;
    config.values = read_values(values_path.trim());

    config.plugins = plugin_menu(prompter, registry, &config.namespace)?;

    config
        .validate()
        .context("the answers do not form a valid application")?;
    Ok(config)
}

fn ask_required(
    prompter: &mut dyn Prompter,
    title: &str,
    description: &str,
    default: Option<&str>,
) -> Result<String> {
    let mut prompt = TextPrompt::new(title, description).required();
    if let Some(default) = default {
        prompt = prompt.default_value(default);
    }
    let answer = prompter.input(&prompt)?.trim().to_string();
    if answer.is_empty() {
        anyhow::bail!(msg!(MESSAGES.common.missing_information, field = title));
    }
    Ok(answer)
}

fn ask_namespace(prompter: &mut dyn Prompter, lister: Option<&dyn ClusterLister>) -> Result<String> {
    const TITLE: &str = "Namespace";
    const DESCRIPTION: &str = "Kubernetes namespace to deploy into";

    let namespaces = match lister.map(|l| l.namespaces()) {
        Some(Ok(names)) if !names.is_empty() => names,
        Some(Ok(_)) | None => Vec::new(),
        Some(Err(e)) => {
            warn!(error = %format!("{e:#}"), "Failed to list namespaces, using manual entry");
            Vec::new()
        }
    };

    if !namespaces.is_empty() {
        let default_index = namespaces
            .iter()
            .position(|n| n == DEFAULT_NAMESPACE)
            .unwrap_or(0);
        let mut items = namespaces.clone();
        items.push(MESSAGES.plugin.manual_entry.to_string());

        let index = prompter.select(TITLE, DESCRIPTION, &items, default_index)?;
        if let Some(name) = namespaces.get(index) {
            return Ok(name.clone());
        }
    }

    ask_required(prompter, TITLE, DESCRIPTION, Some(DEFAULT_NAMESPACE))
}

/// Contents of the values file at `path`. An unreadable file is reported and
/// treated as empty.
fn read_values(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    match fs::read_to_string(Path::new(path)) {
        Ok(contents) => {
            debug!(path, bytes = contents.len(), "Read Helm values file");
            Some(contents)
        }
        Err(e) => {
            warn!(path, error = %e, "Failed to read Helm values file");
            println!(
                "{}",
                msg!(MESSAGES.common.values_read_failed, path = path, error = e)
            );
            None
        }
    }
}

/// Repeatedly offer the registered plugins until the user picks Done.
///
/// An instance whose answers fail validation is reported and dropped; the
/// menu continues with the instances configured so far.
pub fn plugin_menu(
    prompter: &mut dyn Prompter,
    registry: &Registry,
    namespace: &str,
) -> Result<Vec<PluginInstanceConfig>> {
    let plugins = registry.list();
    let mut items: Vec<String> = plugins
        .iter()
        .map(|p| msg!(MESSAGES.plugin.add_option, name = p.name(), description = p.description()))
        .collect();
    items.push(MESSAGES.plugin.done_option.to_string());
    let done = plugins.len();

    let mut instances: Vec<(PluginInstanceConfig, String)> = Vec::new();

    loop {
        prompter.section(MESSAGES.plugin.menu_title);
        let default = if instances.is_empty() { 0 } else { done };
        let choice = prompter.select(
            "Plugins",
            &menu_status(&instances),
            &items,
            default,
        )?;

        let Some(plugin) = plugins.get(choice).copied() else {
            break;
        };

        match configure_instance(plugin, prompter, namespace) {
            Ok(instance) => {
                let label = plugin.instance_label(&instance.values);
                println!(
                    "{}",
                    msg!(MESSAGES.plugin.instance_added, plugin = plugin.name(), label = &label)
                );
                instances.push((instance, label));
            }
            Err(e) => {
                warn!(plugin = plugin.name(), error = %format!("{e:#}"), "Plugin instance discarded");
                println!(
                    "{}",
                    msg!(MESSAGES.common.error_generic, error = format!("{e:#}"))
                );
            }
        }
    }

    debug!(count = instances.len(), "Plugin menu finished");
    Ok(instances.into_iter().map(|(instance, _)| instance).collect())
}

fn configure_instance(
    plugin: &dyn Plugin,
    prompter: &mut dyn Prompter,
    namespace: &str,
) -> Result<PluginInstanceConfig> {
    let values = collect_values(plugin, prompter, namespace)?;
    plugin.validate(&values)?;
    Ok(PluginInstanceConfig::new(plugin.name(), values))
}

fn menu_status(instances: &[(PluginInstanceConfig, String)]) -> String {
    if instances.is_empty() {
        return MESSAGES.plugin.menu_none.to_string();
    }

    let mut lines = vec![msg!(MESSAGES.plugin.menu_configured, count = instances.len())];
    for (index, (instance, label)) in instances.iter().enumerate() {
        lines.push(msg!(
            MESSAGES.plugin.menu_entry,
            index = index + 1,
            plugin = &instance.plugin_name,
            label = label
        ));
    }
    lines.push(MESSAGES.plugin.menu_footer.to_string());
    lines.join("\n")
}
