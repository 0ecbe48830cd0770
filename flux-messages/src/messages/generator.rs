//! Messages printed around a generation run

pub struct GeneratorMessages {
    pub starting: &'static str,
    pub success: &'static str,
    pub files_created: &'static str,
    pub file_entry: &'static str,
    pub plugin_files_header: &'static str,
    pub plugin_file_entry: &'static str,
    pub summary_header: &'static str,
    pub summary_app: &'static str,
    pub summary_namespace: &'static str,
    pub summary_chart: &'static str,
    pub summary_interval: &'static str,
    pub summary_plugins: &'static str,
    pub summary_plugin_entry: &'static str,
    pub next_steps: &'static str,
}

pub const GENERATOR_MESSAGES: GeneratorMessages = GeneratorMessages {
    starting: "⚙️  Generating Flux structure for '{app}' in namespace '{namespace}'...",
    success: "✅ Generated Flux structure for '{app}' in namespace '{namespace}'",
    files_created: "📁 Files created in directory: {dir}/",
    file_entry: "   - {path}",
    plugin_files_header: "🔌 Generated {count} plugin file(s):",
    plugin_file_entry: "   - {plugin}: {path}",
    summary_header: "\n🎉 Successfully generated Flux GitOps structure!",
    summary_app: "📁 Application: {app}",
    summary_namespace: "🏷️  Namespace: {namespace}",
    summary_chart: "📦 Chart: {chart}@{version}",
    summary_interval: "🔄 Sync Interval: {interval}",
    summary_plugins: "🔌 Plugin Instances: {count}",
    summary_plugin_entry: "   {index}. {plugin} - {label}",
    next_steps: "\n💡 Next steps:\n   1. Review the generated files in the '{dir}/' directory\n   2. Customize the values in '{dir}/release/helm-values.yaml'\n   3. Commit to your Git repository\n   4. Apply to your cluster: kubectl apply -k {dir}/",
};
