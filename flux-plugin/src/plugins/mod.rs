//! Built-in plugins.

pub mod external_secret;
pub mod image_update;

pub use external_secret::ExternalSecretPlugin;
pub use image_update::{
    timestamp_to_numerical_policy, AutomationSettings, ImagePolicy, ImageRepository,
    ImageUpdatePlugin,
};
