use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use flux_plugin::{
    collect_values, values_from, Answer, ErrorKind, Plugin, PluginValues, Registry, ScriptedPrompter,
    StaticLister, Value,
};

fn datadog_values() -> PluginValues {
    values_from([
        ("name", "api-secret"),
        ("secret_store_type", "ClusterSecretStore"),
        ("secret_store_name", "vault-backend"),
        ("secret_key", "datadog/api-key"),
        ("target_secret_name", "datadog-secret"),
        ("refresh_interval", "60m"),
    ])
}

#[test]
fn test_datadog_secret_end_to_end() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Registry::new(None);
    let plugin = registry
        .get("externalsecret")
        .ok_or_else(|| anyhow::anyhow!("externalsecret not registered"))?;

    let values = datadog_values();
    plugin.validate(&values)?;
    let paths = plugin.generate_file(&values, temp_dir.path(), "monitoring")?;

    assert_eq!(
        paths,
        [PathBuf::from("dependencies/external-secret-datadog-secret.yaml")]
    );
    let written: Vec<_> = fs::read_dir(temp_dir.path().join("dependencies"))?.collect();
    assert_eq!(written.len(), 1);

    let content = fs::read_to_string(temp_dir.path().join(&paths[0]))?;
    assert!(content.contains("kind: ExternalSecret"));
    assert!(content.contains("namespace: monitoring"));
    assert!(content.contains("refreshInterval: 60m"));
    assert!(content.contains("  target:\n    creationPolicy: Owner\n    name: datadog-secret"));
    assert!(content.ends_with("name: datadog-secret\n"));
    assert!(!content.ends_with("\n\n"));

    let manifest: serde_yaml_ng::Value = serde_yaml_ng::from_str(&content)?;
    assert_eq!(manifest["spec"]["secretStoreRef"]["name"], "vault-backend");
    assert_eq!(manifest["spec"]["dataFrom"][0]["extract"]["key"], "datadog/api-key");
    Ok(())
}

#[test]
fn test_generate_twice_is_byte_identical() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Registry::new(None);
    let plugin = registry.get("externalsecret").expect("registered");

    let first_paths = plugin.generate_file(&datadog_values(), temp_dir.path(), "monitoring")?;
    let first = fs::read(temp_dir.path().join(&first_paths[0]))?;
    let second_paths = plugin.generate_file(&datadog_values(), temp_dir.path(), "monitoring")?;
    let second = fs::read(temp_dir.path().join(&second_paths[0]))?;

    assert_eq!(first_paths, second_paths);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_omitted_refresh_interval_renders_default() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Registry::new(None);
    let plugin = registry.get("externalsecret").expect("registered");

    let mut values = datadog_values();
    values.shift_remove("refresh_interval");
    plugin.validate(&values)?;
    let paths = plugin.generate_file(&values, temp_dir.path(), "monitoring")?;

    let content = fs::read_to_string(temp_dir.path().join(&paths[0]))?;
    assert!(content.contains("refreshInterval: 60m"));
    Ok(())
}

#[test]
fn test_validation_names_plugin_and_variable() {
    let registry = Registry::new(None);
    let plugin = registry.get("externalsecret").expect("registered");

    let mut values = datadog_values();
    values.shift_remove("secret_key");
    let err = plugin.validate(&values).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.plugin(), "externalsecret");
    assert_eq!(err.variable(), Some("secret_key"));

    let mut values = datadog_values();
    values.insert("refresh_interval".into(), Value::from("1 hour"));
    let err = plugin.validate(&values).unwrap_err();
    assert!(err.to_string().contains("value is not one of the allowed options"));

    let mut values = datadog_values();
    values.insert("unrelated".into(), Value::from(true));
    assert!(plugin.validate(&values).is_ok());
}

#[test]
fn test_write_failure_names_path() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("dependencies"), "file in the way")?;

    let registry = Registry::new(None);
    let plugin = registry.get("externalsecret").expect("registered");
    let err = plugin
        .generate_file(&datadog_values(), temp_dir.path(), "monitoring")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileSystem);
    assert!(err.to_string().contains("create_directory"));
    assert!(err.to_string().contains("dependencies"));
    Ok(())
}

#[test]
fn test_form_offers_cluster_stores() -> anyhow::Result<()> {
    let lister = StaticLister::new()
        .with_cluster_store("aws-store")
        .with_cluster_store("vault-backend");
    let registry = Registry::new(Some(Arc::new(lister)));
    let plugin = registry.get("externalsecret").expect("registered");

    let mut prompter = ScriptedPrompter::new([
        Answer::text("api-secret"),
        Answer::Default,
        Answer::Select(1),
        Answer::text("datadog/api-key"),
        Answer::text("datadog-secret"),
        Answer::Default,
    ]);
    let values = collect_values(plugin, &mut prompter, "monitoring")?;

    assert_eq!(values["secret_store_name"], Value::from("vault-backend"));
    assert_eq!(values["refresh_interval"], Value::from("60m"));
    assert_eq!(prompter.remaining(), 0);
    plugin.validate(&values)?;
    Ok(())
}

#[test]
fn test_form_manual_entry_escape() -> anyhow::Result<()> {
    let lister = StaticLister::new().with_store("monitoring", "local-store");
    let registry = Registry::new(Some(Arc::new(lister)));
    let plugin = registry.get("externalsecret").expect("registered");

    let mut prompter = ScriptedPrompter::new([
        Answer::text("api-secret"),
        Answer::Select(1),
        // one suggestion, so index 1 is manual entry
        Answer::Select(1),
        Answer::text("typed-store"),
        Answer::text("datadog/api-key"),
        Answer::text("datadog-secret"),
        Answer::Select(0),
    ]);
    let values = collect_values(plugin, &mut prompter, "monitoring")?;

    assert_eq!(values["secret_store_type"], Value::from("SecretStore"));
    assert_eq!(values["secret_store_name"], Value::from("typed-store"));
    assert_eq!(values["refresh_interval"], Value::from("15m"));
    Ok(())
}

#[test]
fn test_form_without_lister_uses_text_entry() -> anyhow::Result<()> {
    let registry = Registry::new(None);
    let plugin = registry.get("externalsecret").expect("registered");

    let mut prompter = ScriptedPrompter::new([
        Answer::text("api-secret"),
        Answer::Default,
        Answer::text("vault-backend"),
        Answer::text("datadog/api-key"),
        Answer::text("datadog-secret"),
        Answer::Default,
    ]);
    let values = collect_values(plugin, &mut prompter, "monitoring")?;
    assert_eq!(values, datadog_values());
    Ok(())
}

#[test]
fn test_target_name_cannot_leave_app_dir() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let app_dir = temp_dir.path().join("app");
    let registry = Registry::new(None);
    let plugin = registry
        .get("externalsecret")
        .ok_or_else(|| anyhow::anyhow!("externalsecret not registered"))?;

    let mut values = datadog_values();
    values.insert("target_secret_name".into(), Value::from("a/../../../escaped"));
    plugin.validate(&values)?;

    let err = plugin
        .generate_file(&values, &app_dir, "monitoring")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Template);
    assert!(err.to_string().contains("externalsecret"));
    assert!(!temp_dir.path().join("escaped.yaml").exists());
    assert!(!app_dir.exists());
    Ok(())
}
