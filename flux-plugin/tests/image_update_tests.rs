use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use flux_plugin::plugins::{ImagePolicy, ImageRepository, ImageUpdatePlugin};
use flux_plugin::{values_from, ErrorKind, Plugin, PluginValues, Registry};

fn values(repositories: serde_json::Value, policies: serde_json::Value) -> PluginValues {
    values_from([
        ("automation_name", "app-automation".to_string()),
        ("image_repositories", repositories.to_string()),
        ("image_policies", policies.to_string()),
    ])
}

fn read(root: &Path, file: &str) -> anyhow::Result<String> {
    Ok(fs::read_to_string(root.join("update").join(file))?)
}

#[test]
fn test_repository_blocks_match_records() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let repositories = json!([
        {"name": "frontend", "image": "ghcr.io/acme/frontend", "interval": "6h", "secretRef": "regcred"},
        {"name": "backend", "image": "ghcr.io/acme/backend", "interval": "12h", "secretRef": ""},
        {"name": "worker", "image": "ghcr.io/acme/worker", "interval": "24h"},
    ]);
    let values = values(repositories, json!([]));

    plugin.validate(&values)?;
    plugin.generate_file(&values, temp_dir.path(), "apps")?;

    let content = read(temp_dir.path(), "image-repository.yaml")?;
    assert_eq!(content.matches("kind: ImageRepository").count(), 3);
    assert_eq!(content.matches("secretRef:").count(), 1);
    assert!(content.contains("  name: frontend\nspec:\n  image: ghcr.io/acme/frontend\n  interval: 6h\n  secretRef:\n    name: regcred\n"));
    assert!(content.contains("  image: ghcr.io/acme/backend\n  interval: 12h\n---"));
    assert!(content.contains("  name: worker\n"));
    assert!(content.ends_with("interval: 24h\n"));

    let documents: Vec<ImageRepositoryDoc> = content
        .split("---\n")
        .filter(|doc| !doc.trim().is_empty())
        .map(serde_yaml_ng::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[1].metadata.name, "backend");
    Ok(())
}

#[derive(serde::Deserialize)]
struct ImageRepositoryDoc {
    metadata: Metadata,
}

#[derive(serde::Deserialize)]
struct Metadata {
    name: String,
}

#[test]
fn test_policy_branches_by_type() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let policies = json!([
        {"name": "stable", "repository": "frontend", "policyType": "semver", "range": "*"},
        {"name": "nightly", "repository": "backend", "policyType": "numerical",
         "pattern": "^main-[a-f0-9]+-(?P<ts>[0-9]+)", "extract": "$ts", "order": "asc"},
    ]);
    let values = values(json!([]), policies);

    plugin.validate(&values)?;
    plugin.generate_file(&values, temp_dir.path(), "apps")?;

    let content = read(temp_dir.path(), "image-policy.yaml")?;
    let blocks: Vec<&str> = content.split("---\n").filter(|b| !b.is_empty()).collect();
    assert_eq!(blocks.len(), 2);

    assert!(blocks[0].contains("  policy:\n    semver:\n      range: '*'\n"));
    assert!(!blocks[0].contains("filterTags"));

    assert!(blocks[1].contains("  filterTags:\n    pattern: '^main-[a-f0-9]+-(?P<ts>[0-9]+)'\n    extract: '$ts'\n"));
    assert!(blocks[1].contains("    numerical:\n      order: asc\n"));
    assert!(!blocks[1].contains("semver"));
    Ok(())
}

#[test]
fn test_timestamp_policy_renders_as_numerical() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let policies = json!([{"name": "nightly", "repository": "backend", "policyType": "timestamp"}]);
    let values = values(json!([]), policies);

    plugin.validate(&values)?;
    plugin.generate_file(&values, temp_dir.path(), "apps")?;

    let content = read(temp_dir.path(), "image-policy.yaml")?;
    assert!(content.contains("filterTags:"));
    assert!(content.contains("order: asc"));
    assert!(!content.contains("timestamp"));
    Ok(())
}

#[test]
fn test_empty_arrays_still_write_three_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let registry = Registry::new(None);
    let plugin = registry.get("imageupdate").expect("registered");
    let values = values(json!([]), json!([]));

    plugin.validate(&values)?;
    let paths = plugin.generate_file(&values, temp_dir.path(), "apps")?;

    assert_eq!(
        paths,
        [
            PathBuf::from("update/image-repository.yaml"),
            PathBuf::from("update/image-policy.yaml"),
            PathBuf::from("update/image-update-automation.yaml"),
        ]
    );
    assert_eq!(read(temp_dir.path(), "image-repository.yaml")?, "\n");
    assert_eq!(read(temp_dir.path(), "image-policy.yaml")?, "\n");

    let automation = read(temp_dir.path(), "image-update-automation.yaml")?;
    assert!(automation.contains("kind: ImageUpdateAutomation"));
    assert!(automation.contains("  name: app-automation\n  namespace: apps\n"));
    Ok(())
}

#[test]
fn test_automation_defaults_and_overrides() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let mut values = values(json!([]), json!([]));
    values.insert("git_branch".into(), "release".into());

    plugin.generate_file(&values, temp_dir.path(), "apps")?;

    let automation = read(temp_dir.path(), "image-update-automation.yaml")?;
    let manifest: serde_yaml_ng::Value = serde_yaml_ng::from_str(&automation)?;
    let spec = &manifest["spec"];
    assert_eq!(spec["interval"], "10m");
    assert_eq!(spec["sourceRef"]["name"], "flux-system");
    assert_eq!(spec["git"]["push"]["branch"], "release");
    assert_eq!(spec["git"]["commit"]["messageTemplate"], "chore: update container versions");
    assert_eq!(spec["update"]["strategy"], "Setters");
    Ok(())
}

#[test]
fn test_generate_is_idempotent() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let repositories = vec![ImageRepository {
        name: "app".into(),
        image: "nginx".into(),
        interval: "6h".into(),
        secret_ref: String::new(),
    }];
    let policies = vec![ImagePolicy {
        name: "app".into(),
        repository: "app".into(),
        policy_type: "semver".into(),
        range: "^1.0.0".into(),
        ..ImagePolicy::default()
    }];
    let values = values(serde_json::to_value(&repositories)?, serde_json::to_value(&policies)?);

    plugin.generate_file(&values, temp_dir.path(), "apps")?;
    let first: Vec<String> = ["image-repository.yaml", "image-policy.yaml", "image-update-automation.yaml"]
        .iter()
        .map(|f| read(temp_dir.path(), f))
        .collect::<anyhow::Result<_>>()?;
    plugin.generate_file(&values, temp_dir.path(), "apps")?;
    let second: Vec<String> = ["image-repository.yaml", "image-policy.yaml", "image-update-automation.yaml"]
        .iter()
        .map(|f| read(temp_dir.path(), f))
        .collect::<anyhow::Result<_>>()?;

    assert_eq!(first, second);
    assert!(first.iter().all(|c| c.ends_with('\n') && !c.ends_with("\n\n")));
    Ok(())
}

#[test]
fn test_decode_error_at_generate_time() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let plugin = ImageUpdatePlugin::new();
    let values = values_from([
        ("automation_name", "app-automation"),
        ("image_repositories", "[{\"name\": "),
    ]);

    let err = plugin.generate_file(&values, temp_dir.path(), "apps").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("image_repositories"));
    Ok(())
}
