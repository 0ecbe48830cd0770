//! Central registry for all user-facing message templates.
//!
//! Organized by domain:
//! - `generator` - output of a generation run
//! - `plugin` - plugin menu, listing, and cluster assistance
//! - `common` - shared messages (errors, config files)
//!
//! ```rust
//! use flux_messages::MESSAGES;
//!
//! let header = MESSAGES.plugin.list_header;
//! let done = MESSAGES.generator.success;
//! # let _ = (header, done);
//! ```

mod common;
mod generator;
mod plugin;

pub use common::{CommonMessages, COMMON_MESSAGES};
pub use generator::{GeneratorMessages, GENERATOR_MESSAGES};
pub use plugin::{PluginMessages, PLUGIN_MESSAGES};

pub struct Messages {
    pub generator: GeneratorMessages,
    pub plugin: PluginMessages,
    pub common: CommonMessages,
}

pub const MESSAGES: Messages = Messages {
    generator: GENERATOR_MESSAGES,
    plugin: PLUGIN_MESSAGES,
    common: COMMON_MESSAGES,
};
