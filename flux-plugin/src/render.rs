//! Template rendering and manifest writing shared by all plugins.

use std::error::Error as StdError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, warn};

use crate::error::{FileOperation, PluginError, TemplateKind};
use crate::value::PluginValues;
use crate::variable::Variable;

/// Context key holding the target namespace in every template.
pub const NAMESPACE_KEY: &str = "Namespace";

/// Build a template context: declared defaults for absent variables, then
/// the submitted values, then the injected namespace.
pub fn build_context(variables: &[Variable], values: &PluginValues, namespace: &str) -> Context {
    let mut context = Context::new();
    for variable in variables {
        if let Some(default) = &variable.default {
            let absent = values.get(&variable.name).map_or(true, |v| v.is_null());
            if absent {
                context.insert(variable.name.as_str(), default);
            }
        }
    }
    for (key, value) in values {
        if !value.is_null() {
            context.insert(key.as_str(), value);
        }
    }
    context.insert(NAMESPACE_KEY, namespace);
    context
}

/// Render a plugin template. Autoescaping is off: the output is YAML, not HTML.
pub fn render(
    plugin: &str,
    kind: TemplateKind,
    template: &str,
    context: &Context,
) -> Result<String, PluginError> {
    Tera::one_off(template, context, false).map_err(|e| PluginError::Template {
        plugin: plugin.to_string(),
        kind,
        message: error_chain(&e),
    })
}

/// Flatten an error and its sources into one line. Tera keeps the useful
/// detail (line, column, missing variable) in the source chain.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Return `content` ending in exactly one newline.
pub fn ensure_trailing_newline(content: &str) -> String {
    let mut out = content.trim_end_matches(['\n', '\r']).to_string();
    out.push('\n');
    out
}

/// Turn a rendered path template into a path that stays under the output
/// root: non-empty, relative, and free of `..` segments.
pub fn output_path(plugin: &str, rendered: &str) -> Result<PathBuf, PluginError> {
    let path_error = |message: String| PluginError::Template {
        plugin: plugin.to_string(),
        kind: TemplateKind::Path,
        message,
    };

    let rendered = rendered.trim();
    if rendered.is_empty() {
        return Err(path_error(
            "file path template rendered an empty path".to_string(),
        ));
    }

    let path = PathBuf::from(rendered);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(path_error(format!(
            "rendered path '{rendered}' must stay inside the output directory"
        )));
    }
    Ok(path)
}

/// Write a rendered manifest, creating parent directories and replacing any
/// existing file. A failed flush after the content was written is only logged.
pub fn write_manifest(plugin: &str, path: &Path, content: &str) -> Result<(), PluginError> {
    let fs_error = |operation, path: &Path, source| PluginError::FileSystem {
        plugin: plugin.to_string(),
        operation,
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| fs_error(FileOperation::CreateDirectory, parent, e))?;
    }

    let mut file =
        File::create(path).map_err(|e| fs_error(FileOperation::CreateFile, path, e))?;
    file.write_all(ensure_trailing_newline(content).as_bytes())
        .map_err(|e| fs_error(FileOperation::WriteFile, path, e))?;

    if let Err(e) = file.sync_all() {
        warn!(plugin, path = %path.display(), error = %e, "Failed to flush generated file");
    }

    debug!(plugin, path = %path.display(), "Wrote manifest");
    Ok(())
}
