//! flux-generator
//!
//! Writes a Flux application directory: the Helm repository, release, values
//! and Kustomization, plus whatever the configured plugin instances produce.

mod error;
mod generate;
mod templates;

pub use error::GenerateError;
pub use generate::{generate_flux_structure, GenerationReport, PluginOutput};
pub use templates::{
    render_base, BaseManifest, HELM_RELEASE_PATH, HELM_REPOSITORY_PATH, HELM_VALUES_PATH,
    KUSTOMIZATION_PATH,
};
