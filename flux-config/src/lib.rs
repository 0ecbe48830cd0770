//! flux-config
//!
//! The application description a generation run works from: which Helm chart
//! to deploy, where, and which plugin instances to add.

mod config;
mod error;

pub use config::{AppConfig, DEFAULT_INTERVAL};
pub use error::ConfigError;
