//! Common/shared messages across commands

pub struct CommonMessages {
    pub app_config_title: &'static str,
    pub banner: &'static str,
    pub config_loaded: &'static str,
    pub config_saved: &'static str,
    pub error_generic: &'static str,
    pub missing_information: &'static str,
    pub settings_title: &'static str,
    pub values_read_failed: &'static str,
}

pub const COMMON_MESSAGES: CommonMessages = CommonMessages {
    app_config_title: "📝 Application Configuration",
    banner: "🚀 Flux App Generator",
    config_loaded: "📄 Loaded configuration from {path}",
    config_saved: "💾 Saved configuration to {path}",
    error_generic: "❌ Error: {error}",
    missing_information: "❌ Missing required information: {field}",
    settings_title: "⚙️  Configuration",
    values_read_failed: "⚠️  Could not read values file {path}: {error}. Using an empty values file.",
};
