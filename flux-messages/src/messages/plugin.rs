//! Plugin menu, listing, and cluster assistance messages

pub struct PluginMessages {
    pub add_option: &'static str,
    pub cluster_connected: &'static str,
    pub cluster_disabled: &'static str,
    pub cluster_probe: &'static str,
    pub cluster_unavailable: &'static str,
    pub configure_title: &'static str,
    pub done_option: &'static str,
    pub image_automation_step: &'static str,
    pub image_policy_step: &'static str,
    pub image_range_step: &'static str,
    pub image_repository_step: &'static str,
    pub instance_added: &'static str,
    pub list_header: &'static str,
    pub list_entry: &'static str,
    pub list_variable: &'static str,
    pub manual_entry: &'static str,
    pub menu_configured: &'static str,
    pub menu_entry: &'static str,
    pub menu_footer: &'static str,
    pub menu_none: &'static str,
    pub menu_title: &'static str,
}

pub const PLUGIN_MESSAGES: PluginMessages = PluginMessages {
    add_option: "➕ Add {name} - {description}",
    cluster_connected: "✅ Kubernetes connection successful! Auto-completion enabled.",
    cluster_disabled: "ℹ️  Cluster lookups disabled. Enter resource names manually.",
    cluster_probe: "🔍 Testing Kubernetes connection...",
    cluster_unavailable: "❌ Could not connect to Kubernetes cluster. Auto-completion will be disabled.",
    configure_title: "🔧 Configure {name} Plugin Instance",
    done_option: "✅ Done with plugins",
    image_automation_step: "⚙️  Step 3: Configure Update Automation",
    image_policy_step: "🏷️  Step 2: Configure Image Policy",
    image_range_step: "🏷️  Semantic Version Range",
    image_repository_step: "📦 Step 1: Configure Image Repository",
    instance_added: "➕ Added {plugin} instance: {label}",
    list_header: "Available plugins:",
    list_entry: "  {name} - {description}",
    list_variable: "      {name} ({kind}{required}): {description}",
    manual_entry: "✏️  Enter a name manually",
    menu_configured: "Currently configured: {count} plugin instance(s):",
    menu_entry: "  {index}. {plugin} - {label}",
    menu_footer: "Select a plugin to add another instance, or choose Done.",
    menu_none: "No plugin instances configured yet. Select a plugin to add.",
    menu_title: "🔌 Plugin Manager",
};
