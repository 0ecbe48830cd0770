//! The generation run.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use tracing::{debug, info, warn};

use flux_config::AppConfig;
use flux_plugin::{ensure_trailing_newline, Registry};

use crate::error::GenerateError;
use crate::templates::{render_base, BaseManifest, HELM_VALUES_PATH};

/// Files one plugin instance produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutput {
    pub plugin: String,
    pub label: String,
    /// Relative to the application directory.
    pub files: Vec<PathBuf>,
}

/// What a generation run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub app_dir: PathBuf,
    /// Every written file, relative to `app_dir`, in write order.
    pub files: Vec<PathBuf>,
    pub plugin_outputs: Vec<PluginOutput>,
}

impl GenerationReport {
    pub fn plugin_file_count(&self) -> usize {
        self.plugin_outputs.iter().map(|o| o.files.len()).sum()
    }
}

/// Generate `<output_root>/<app_name>/` from `config`.
///
/// Plugin instances run in configuration order; the first failure aborts the
/// run. The Kustomization is written last so it can list every plugin file.
pub fn generate_flux_structure(
    config: &AppConfig,
    registry: &Registry,
    output_root: &Path,
) -> Result<GenerationReport, GenerateError> {
    config.validate()?;

    let app_dir = config.app_dir(output_root);
    info!(app = %config.app_name, dir = %app_dir.display(), "Generating Flux structure");
    fs::create_dir_all(&app_dir).map_err(|source| GenerateError::CreateDirectory {
        path: app_dir.clone(),
        source,
    })?;

    let mut context = base_context(config);
    let mut files = Vec::new();

    for manifest in [BaseManifest::HelmRepository, BaseManifest::HelmRelease] {
        let content = render_base(manifest, &context)?;
        write_file(&app_dir, Path::new(manifest.path()), &content)?;
        files.push(PathBuf::from(manifest.path()));
    }

    let values = config.values.as_deref().unwrap_or_default();
    write_file(&app_dir, Path::new(HELM_VALUES_PATH), values)?;
    files.push(PathBuf::from(HELM_VALUES_PATH));

    let mut plugin_outputs = Vec::new();
    let mut resources: Vec<String> = [BaseManifest::HelmRepository, BaseManifest::HelmRelease]
        .iter()
        .map(|m| m.path().to_string())
        .collect();
    let mut seen = HashSet::new();

    for (index, instance) in config.plugins.iter().enumerate() {
        let position = index + 1;
        let plugin = registry.get(&instance.plugin_name).ok_or_else(|| {
            GenerateError::PluginNotFound {
                position,
                name: instance.plugin_name.clone(),
            }
        })?;
        let label = plugin.instance_label(&instance.values);
        let wrap = |source| GenerateError::Plugin {
            position,
            plugin: instance.plugin_name.clone(),
            label: label.clone(),
            source,
        };

        debug!(position, plugin = %instance.plugin_name, %label, "Generating plugin instance");
        plugin.validate(&instance.values).map_err(wrap)?;
        let written = plugin
            .generate_file(&instance.values, &app_dir, &config.namespace)
            .map_err(wrap)?;

        for path in &written {
            if seen.insert(path.clone()) {
                resources.push(resource_path(path));
                files.push(path.clone());
            } else {
                warn!(
                    position,
                    plugin = %instance.plugin_name,
                    path = %path.display(),
                    "Plugin output overwrote a file written earlier in this run"
                );
            }
        }

        plugin_outputs.push(PluginOutput {
            plugin: instance.plugin_name.clone(),
            label,
            files: written,
        });
    }

    context.insert("resources", &resources);
    let kustomization = render_base(BaseManifest::Kustomization, &context)?;
    write_file(
        &app_dir,
        Path::new(BaseManifest::Kustomization.path()),
        &kustomization,
    )?;
    files.push(PathBuf::from(BaseManifest::Kustomization.path()));

    info!(
        files = files.len(),
        plugins = plugin_outputs.len(),
        "Generated Flux structure"
    );
    Ok(GenerationReport {
        app_dir,
        files,
        plugin_outputs,
    })
}

fn base_context(config: &AppConfig) -> Context {
    let mut context = Context::new();
    context.insert("app_name", &config.app_name);
    context.insert("namespace", &config.namespace);
    context.insert("helm_repo_name", &config.helm_repo_name);
    context.insert("helm_repo_url", &config.helm_repo_url);
    context.insert("chart_name", &config.chart_name);
    context.insert("chart_version", &config.chart_version);
    context.insert("interval", &config.interval);
    context
}

/// Kustomize resource entry: forward slashes on every platform.
fn resource_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(app_dir: &Path, relative: &Path, content: &str) -> Result<(), GenerateError> {
    let path = app_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, ensure_trailing_newline(content))
        .map_err(|source| GenerateError::Write { path: path.clone(), source })?;
    debug!(path = %path.display(), "Wrote base manifest");
    Ok(())
}
