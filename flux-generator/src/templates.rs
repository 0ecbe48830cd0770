//! Built-in templates for the base manifest set.

use std::sync::OnceLock;
use tera::{Context, Tera};

use flux_plugin::render::error_chain;

use crate::error::GenerateError;

pub const HELM_REPOSITORY_PATH: &str = "dependencies/helm-repository.yaml";
pub const HELM_RELEASE_PATH: &str = "release/helm-release.yaml";
pub const HELM_VALUES_PATH: &str = "release/helm-values.yaml";
pub const KUSTOMIZATION_PATH: &str = "kustomization.yaml";

/// A templated base manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseManifest {
    HelmRepository,
    HelmRelease,
    Kustomization,
}

impl BaseManifest {
    pub fn template_name(&self) -> &'static str {
        match self {
            BaseManifest::HelmRepository => "helm-repository.yaml",
            BaseManifest::HelmRelease => "helm-release.yaml",
            BaseManifest::Kustomization => "kustomization.yaml",
        }
    }

    /// Output path relative to the application directory.
    pub fn path(&self) -> &'static str {
        match self {
            BaseManifest::HelmRepository => HELM_REPOSITORY_PATH,
            BaseManifest::HelmRelease => HELM_RELEASE_PATH,
            BaseManifest::Kustomization => KUSTOMIZATION_PATH,
        }
    }
}

static BASE_TERA: OnceLock<Tera> = OnceLock::new();

fn base_tera() -> &'static Tera {
    BASE_TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(vec![
            (
                BaseManifest::HelmRepository.template_name(),
                include_str!("../templates/helm-repository.yaml.tera"),
            ),
            (
                BaseManifest::HelmRelease.template_name(),
                include_str!("../templates/helm-release.yaml.tera"),
            ),
            (
                BaseManifest::Kustomization.template_name(),
                include_str!("../templates/kustomization.yaml.tera"),
            ),
        ])
        .expect("Failed to add base manifest templates");
        tera
    })
}

pub fn render_base(manifest: BaseManifest, context: &Context) -> Result<String, GenerateError> {
    base_tera()
        .render(manifest.template_name(), context)
        .map_err(|e| GenerateError::Template {
            template: manifest.template_name(),
            message: error_chain(&e),
        })
}
