//! Flux image update automation: repositories, policies, and one automation.
//!
//! Repositories and policies arrive as JSON arrays stored in the text values
//! `image_repositories` and `image_policies`. The custom configuration flow
//! produces them; validation and generation decode them again.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use flux_messages::MESSAGES;

use crate::error::{PluginError, TemplateKind};
use crate::plugin::{BasePlugin, CustomConfigPlugin, Plugin};
use crate::prompt::{select_value, Prompter, TextPrompt};
use crate::render::{build_context, render, write_manifest};
use crate::value::{text_value, PluginValues, Value};
use crate::variable::Variable;

pub const NAME: &str = "imageupdate";

pub const REPOSITORIES_KEY: &str = "image_repositories";
pub const POLICIES_KEY: &str = "image_policies";

pub const POLICY_SEMVER: &str = "semver";
pub const POLICY_NUMERICAL: &str = "numerical";
pub const POLICY_TIMESTAMP: &str = "timestamp";

pub const TIMESTAMP_PATTERN: &str = "^main-[a-f0-9]+-(?P<ts>[0-9]+)";
pub const TIMESTAMP_EXTRACT: &str = "$ts";
pub const TIMESTAMP_ORDER: &str = "asc";

pub const DEFAULT_FLUX_NAMESPACE: &str = "flux-system";
pub const UPDATE_STRATEGY: &str = "Setters";
pub const COMMIT_MESSAGE_TEMPLATE: &str = "chore: update container versions";

/// Directory, relative to the output root, holding the generated files.
pub const UPDATE_DIR: &str = "update";

const OUTPUTS: [(&str, &str); 3] = [
    (
        "image-repository.yaml",
        include_str!("../../templates/image-repository.yaml.tera"),
    ),
    (
        "image-policy.yaml",
        include_str!("../../templates/image-policy.yaml.tera"),
    ),
    (
        "image-update-automation.yaml",
        include_str!("../../templates/image-update-automation.yaml.tera"),
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageRepository {
    pub name: String,
    pub image: String,
    pub interval: String,
    /// Pull secret for private registries; empty for public images.
    pub secret_ref: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePolicy {
    pub name: String,
    pub repository: String,
    pub policy_type: String,
    pub range: String,
    pub pattern: String,
    pub extract: String,
    pub order: String,
}

/// Rewrite a timestamp policy into the numerical policy it stands for:
/// tags shaped like `main-<sha>-<unix time>`, newest timestamp wins.
pub fn timestamp_to_numerical_policy(policy: ImagePolicy) -> ImagePolicy {
    ImagePolicy {
        policy_type: POLICY_NUMERICAL.to_string(),
        range: String::new(),
        pattern: TIMESTAMP_PATTERN.to_string(),
        extract: TIMESTAMP_EXTRACT.to_string(),
        order: TIMESTAMP_ORDER.to_string(),
        ..policy
    }
}

impl ImageRepository {
    fn check(&self, index: usize) -> Result<(), String> {
        let missing = [
            ("name", &self.name),
            ("image", &self.image),
            ("interval", &self.interval),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());

        match missing {
            Some((field, _)) => Err(format!("repository {index}: {field} is required")),
            None => Ok(()),
        }
    }
}

impl ImagePolicy {
    fn check(&self, index: usize) -> Result<(), String> {
        let required = |field: &str, value: &str, suffix: &str| {
            if value.is_empty() {
                Err(format!("policy {index}: {field} is required{suffix}"))
            } else {
                Ok(())
            }
        };

        required("name", &self.name, "")?;
        required("repository", &self.repository, "")?;
        required("policyType", &self.policy_type, "")?;

        match self.policy_type.as_str() {
            POLICY_SEMVER => required("range", &self.range, " for semver policy"),
            POLICY_NUMERICAL => {
                required("pattern", &self.pattern, " for numerical policy")?;
                required("extract", &self.extract, " for numerical policy")?;
                required("order", &self.order, " for numerical policy")
            }
            POLICY_TIMESTAMP => Ok(()),
            other => Err(format!("policy {index}: unsupported policyType '{other}'")),
        }
    }

    /// Timestamp policies become numerical; everything else is unchanged.
    pub fn normalized(self) -> Self {
        if self.policy_type == POLICY_TIMESTAMP {
            timestamp_to_numerical_policy(self)
        } else {
            self
        }
    }
}

/// Git and scheduling settings of the `ImageUpdateAutomation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationSettings {
    pub git_repository_name: String,
    pub git_repository_namespace: String,
    pub update_path: String,
    pub git_branch: String,
    pub author_name: String,
    pub author_email: String,
    pub interval: String,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            git_repository_name: DEFAULT_FLUX_NAMESPACE.to_string(),
            git_repository_namespace: DEFAULT_FLUX_NAMESPACE.to_string(),
            update_path: "./".to_string(),
            git_branch: "main".to_string(),
            author_name: "fluxcdbot".to_string(),
            author_email: "fluxcdbot@users.noreply.github.com".to_string(),
            interval: "10m".to_string(),
        }
    }
}

impl AutomationSettings {
    /// Value names and contents, including the fixed strategy and message.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("git_repository_name", self.git_repository_name.as_str()),
            ("git_repository_namespace", self.git_repository_namespace.as_str()),
            ("update_path", self.update_path.as_str()),
            ("git_branch", self.git_branch.as_str()),
            ("author_name", self.author_name.as_str()),
            ("author_email", self.author_email.as_str()),
            ("automation_interval", self.interval.as_str()),
            ("update_strategy", UPDATE_STRATEGY),
            ("commit_message_template", COMMIT_MESSAGE_TEMPLATE),
        ]
    }

    pub fn write_to(&self, values: &mut PluginValues) {
        for (key, value) in self.entries() {
            values.insert(key.to_string(), Value::from(value));
        }
    }
}

/// Decode a JSON-array value. Absent and null mean "not supplied".
fn decode_records<T: DeserializeOwned>(
    values: &PluginValues,
    field: &str,
) -> Result<Option<Vec<T>>, String> {
    match values.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(json)) => serde_json::from_str(json)
            .map(Some)
            .map_err(|e| format!("invalid JSON format: {e}")),
        Some(Value::Bool(_)) => Err("value must be a JSON-encoded string".to_string()),
    }
}

fn invalid(field: &'static str) -> impl Fn(String) -> PluginError {
    move |message| PluginError::validation(NAME, field, message)
}

pub struct ImageUpdatePlugin {
    base: BasePlugin,
}

impl ImageUpdatePlugin {
    pub fn new() -> Self {
        let variables = vec![Variable::text(
            "automation_name",
            "Name for the ImageUpdateAutomation resource",
        )
        .required()];

        Self {
            base: BasePlugin::new(
                NAME,
                "Generates Flux image update automation resources for automatic container image updates",
                variables,
                "",
                UPDATE_DIR,
            ),
        }
    }

    fn decode_for_generate<T: DeserializeOwned>(
        values: &PluginValues,
        field: &str,
    ) -> Result<Vec<T>, PluginError> {
        decode_records(values, field)
            .map(Option::unwrap_or_default)
            .map_err(|message| PluginError::Decode {
                plugin: NAME.to_string(),
                field: field.to_string(),
                message,
            })
    }

    fn configure_repository(&self, prompter: &mut dyn Prompter) -> Result<ImageRepository> {
        prompter.section(MESSAGES.plugin.image_repository_step);

        let name = prompter.input(
            &TextPrompt::new(
                "Repository Name",
                "Unique name for this image repository",
            )
            .required(),
        )?;
        let image = prompter.input(
            &TextPrompt::new(
                "Container Image",
                "Full image name (e.g., nginx, myregistry/myapp)",
            )
            .required(),
        )?;
        let interval = select_value(
            prompter,
            "Check Interval",
            "How often to check for new image versions",
            &[
                ("1 hour", "60m"),
                ("6 hours", "6h"),
                ("12 hours", "12h"),
                ("24 hours", "24h"),
            ],
            "6h",
        )?;
        let secret_ref = prompter.input(&TextPrompt::new(
            "Secret Reference (Optional)",
            "Name of secret for private registry (leave empty for public)",
        ))?;

        Ok(ImageRepository {
            name,
            image,
            interval,
            secret_ref: secret_ref.trim().to_string(),
        })
    }

    fn configure_policy(
        &self,
        prompter: &mut dyn Prompter,
        repository_name: &str,
    ) -> Result<ImagePolicy> {
        prompter.section(MESSAGES.plugin.image_policy_step);

        let name = prompter.input(
            &TextPrompt::new("Policy Name", "Name for this image policy").required(),
        )?;
        let repository = prompter.input(
            &TextPrompt::new("Image Repository", "ImageRepository this policy evaluates")
                .default_value(repository_name)
                .required(),
        )?;
        let policy_type = select_value(
            prompter,
            "Version Policy",
            "How should image versions be evaluated?",
            &[
                ("Semantic Versioning (1.2.3)", POLICY_SEMVER),
                ("Timestamp-based (main-abc123-1234567890)", POLICY_TIMESTAMP),
            ],
            POLICY_SEMVER,
        )?;

        let policy = ImagePolicy {
            name,
            repository,
            policy_type,
            ..ImagePolicy::default()
        };

        if policy.policy_type == POLICY_TIMESTAMP {
            return Ok(timestamp_to_numerical_policy(policy));
        }

        prompter.section(MESSAGES.plugin.image_range_step);
        let range = select_value(
            prompter,
            "Version Range",
            "Which semantic versions should be considered?",
            &[
                ("Any version (*)", "*"),
                ("Major version (^1.0.0)", "^1.0.0"),
                ("Minor version (~1.2.0)", "~1.2.0"),
            ],
            "*",
        )?;
        Ok(ImagePolicy { range, ..policy })
    }

    fn configure_automation(&self, prompter: &mut dyn Prompter) -> Result<AutomationSettings> {
        prompter.section(MESSAGES.plugin.image_automation_step);
        let defaults = AutomationSettings::default();

        let mut ask = |title: &str, description: &str, default: &str| {
            prompter.input(
                &TextPrompt::new(title, description)
                    .default_value(default)
                    .required(),
            )
        };

        let git_repository_name = ask(
            "GitRepository Name",
            "Name of the GitRepository resource to reference",
            &defaults.git_repository_name,
        )?;
        let git_repository_namespace = ask(
            "GitRepository Namespace",
            "Namespace of the GitRepository resource",
            &defaults.git_repository_namespace,
        )?;
        let update_path = ask(
            "Update Path",
            "Path to update in the repository (e.g., ./apps/myapp)",
            &defaults.update_path,
        )?;
        let git_branch = ask(
            "Git Branch",
            "Git branch to push updates to",
            &defaults.git_branch,
        )?;
        let author_name = ask(
            "Author Name",
            "Author name for git commits",
            &defaults.author_name,
        )?;
        let author_email = ask(
            "Author Email",
            "Author email for git commits",
            &defaults.author_email,
        )?;
        let interval = select_value(
            prompter,
            "Automation Interval",
            "How often to check for updates",
            &[
                ("5 minutes", "5m"),
                ("10 minutes", "10m"),
                ("30 minutes", "30m"),
                ("1 hour", "60m"),
            ],
            &defaults.interval,
        )?;

        Ok(AutomationSettings {
            git_repository_name,
            git_repository_namespace,
            update_path,
            git_branch,
            author_name,
            author_email,
            interval,
        })
    }
}

impl Default for ImageUpdatePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ImageUpdatePlugin {
    fn base(&self) -> &BasePlugin {
        &self.base
    }

    fn validate(&self, values: &PluginValues) -> Result<(), PluginError> {
        self.base.validate(values)?;

        if let Some(repositories) =
            decode_records::<ImageRepository>(values, REPOSITORIES_KEY).map_err(invalid(REPOSITORIES_KEY))?
        {
            for (index, repository) in repositories.iter().enumerate() {
                repository.check(index).map_err(invalid(REPOSITORIES_KEY))?;
            }
        }

        if let Some(policies) =
            decode_records::<ImagePolicy>(values, POLICIES_KEY).map_err(invalid(POLICIES_KEY))?
        {
            for (index, policy) in policies.iter().enumerate() {
                policy.check(index).map_err(invalid(POLICIES_KEY))?;
            }
        }

        Ok(())
    }

    fn generate_file(
        &self,
        values: &PluginValues,
        output_root: &Path,
        namespace: &str,
    ) -> Result<Vec<PathBuf>, PluginError> {
        let repositories: Vec<ImageRepository> =
            Self::decode_for_generate(values, REPOSITORIES_KEY)?;
        let policies: Vec<ImagePolicy> = Self::decode_for_generate(values, POLICIES_KEY)?
            .into_iter()
            .map(ImagePolicy::normalized)
            .collect();

        debug!(
            repositories = repositories.len(),
            policies = policies.len(),
            "Rendering image update automation"
        );

        let mut context = build_context(self.variables(), values, namespace);
        for (key, default) in AutomationSettings::default().entries() {
            if values.get(key).map_or(true, Value::is_null) {
                context.insert(key, default);
            }
        }
        context.insert("repositories", &repositories);
        context.insert("policies", &policies);

        let rendered = OUTPUTS
            .iter()
            .map(|(file, template)| {
                let body = render(NAME, TemplateKind::Body, template, &context)?;
                Ok((Path::new(UPDATE_DIR).join(file), body))
            })
            .collect::<Result<Vec<_>, PluginError>>()?;

        for (relative, body) in &rendered {
            write_manifest(NAME, &output_root.join(relative), body)?;
        }

        info!(plugin = NAME, files = rendered.len(), "Generated image update automation");
        Ok(rendered.into_iter().map(|(path, _)| path).collect())
    }

    fn instance_label(&self, values: &PluginValues) -> String {
        text_value(values, "automation_name")
            .filter(|s| !s.is_empty())
            .unwrap_or("configured")
            .to_string()
    }

    fn as_custom_config(&self) -> Option<&dyn CustomConfigPlugin> {
        Some(self)
    }
}

impl CustomConfigPlugin for ImageUpdatePlugin {
    fn collect_custom_config(
        &self,
        values: &mut PluginValues,
        prompter: &mut dyn Prompter,
    ) -> Result<()> {
        let repository = self
            .configure_repository(prompter)
            .context("failed to configure image repository")?;
        let policy = self
            .configure_policy(prompter, &repository.name)
            .context("failed to configure image policy")?;
        let automation = self
            .configure_automation(prompter)
            .context("failed to configure image update automation")?;

        values.insert(
            REPOSITORIES_KEY.to_string(),
            Value::Text(serde_json::to_string(&[repository])?),
        );
        values.insert(
            POLICIES_KEY.to_string(),
            Value::Text(serde_json::to_string(&[policy])?),
        );
        automation.write_to(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::prompt::{Answer, ScriptedPrompter};
    use crate::value::values_from;
    use crate::variable::validate_schema;

    fn semver_policy() -> ImagePolicy {
        ImagePolicy {
            name: "app".into(),
            repository: "app".into(),
            policy_type: POLICY_SEMVER.into(),
            range: "*".into(),
            ..ImagePolicy::default()
        }
    }

    fn values_with(repositories: &str, policies: &str) -> PluginValues {
        values_from([
            ("automation_name", "app-automation"),
            (REPOSITORIES_KEY, repositories),
            (POLICIES_KEY, policies),
        ])
    }

    #[test]
    fn test_schema() {
        let plugin = ImageUpdatePlugin::new();
        assert_eq!(plugin.name(), "imageupdate");
        assert_eq!(plugin.variables().len(), 1);
        assert!(plugin.variables()[0].required);
        assert!(validate_schema(plugin.variables()).is_ok());
        assert!(plugin.as_custom_config().is_some());
    }

    #[test]
    fn test_timestamp_to_numerical_policy() {
        let policy = ImagePolicy {
            name: "app".into(),
            repository: "app".into(),
            policy_type: POLICY_TIMESTAMP.into(),
            range: "*".into(),
            ..ImagePolicy::default()
        };

        let converted = timestamp_to_numerical_policy(policy);
        assert_eq!(converted.policy_type, "numerical");
        assert_eq!(converted.pattern, "^main-[a-f0-9]+-(?P<ts>[0-9]+)");
        assert_eq!(converted.extract, "$ts");
        assert_eq!(converted.order, "asc");
        assert!(converted.range.is_empty());
        assert_eq!(converted.name, "app");
    }

    #[test]
    fn test_normalized_leaves_semver_alone() {
        assert_eq!(semver_policy().normalized(), semver_policy());
    }

    #[test]
    fn test_policy_json_field_names() -> anyhow::Result<()> {
        let json = serde_json::to_value(semver_policy())?;
        assert_eq!(json["policyType"], "semver");
        let repo: ImageRepository =
            serde_json::from_str(r#"{"name":"a","image":"b","interval":"6h"}"#)?;
        assert!(repo.secret_ref.is_empty());
        Ok(())
    }

    #[test]
    fn test_validate_repository_fields() {
        let plugin = ImageUpdatePlugin::new();
        let values = values_with(
            r#"[{"name":"a","image":"nginx","interval":"6h"},{"name":"b","image":"nginx","interval":"6h"},{"name":"c","interval":"6h"}]"#,
            "[]",
        );
        let err = plugin.validate(&values).unwrap_err();
        assert_eq!(err.variable(), Some(REPOSITORIES_KEY));
        assert!(err.to_string().contains("repository 2: image is required"));
    }

    #[test]
    fn test_validate_policy_type_rules() {
        let plugin = ImageUpdatePlugin::new();
        let cases = [
            (r#"[{"name":"p","repository":"r"}]"#, "policy 0: policyType is required"),
            (
                r#"[{"name":"p","repository":"r","policyType":"semver"}]"#,
                "policy 0: range is required for semver policy",
            ),
            (
                r#"[{"name":"p","repository":"r","policyType":"numerical","pattern":"x","extract":"$ts"}]"#,
                "policy 0: order is required for numerical policy",
            ),
            (
                r#"[{"name":"p","repository":"r","policyType":"alphabetical"}]"#,
                "unsupported policyType 'alphabetical'",
            ),
        ];

        for (policies, expected) in cases {
            let err = plugin.validate(&values_with("[]", policies)).unwrap_err();
            assert_eq!(err.variable(), Some(POLICIES_KEY));
            assert!(err.to_string().contains(expected), "{err}");
        }

        let timestamp = r#"[{"name":"p","repository":"r","policyType":"timestamp"}]"#;
        assert!(plugin.validate(&values_with("[]", timestamp)).is_ok());
    }

    #[test]
    fn test_validate_bad_json() {
        let plugin = ImageUpdatePlugin::new();
        let err = plugin.validate(&values_with("{not json", "[]")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("invalid JSON format"));

        let mut values = values_with("[]", "[]");
        values.insert(POLICIES_KEY.into(), Value::Bool(true));
        let err = plugin.validate(&values).unwrap_err();
        assert!(err.to_string().contains("JSON-encoded string"));
    }

    #[test]
    fn test_validate_runs_base_checks_first() {
        let plugin = ImageUpdatePlugin::new();
        let values = values_from([(REPOSITORIES_KEY, "{not json")]);
        let err = plugin.validate(&values).unwrap_err();
        assert_eq!(err.variable(), Some("automation_name"));
    }

    #[test]
    fn test_generate_decode_failure() -> anyhow::Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let plugin = ImageUpdatePlugin::new();
        let err = plugin
            .generate_file(&values_with("[]", "nope"), temp_dir.path(), "apps")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!temp_dir.path().join(UPDATE_DIR).exists());
        Ok(())
    }

    #[test]
    fn test_custom_config_timestamp_flow() -> anyhow::Result<()> {
        let plugin = ImageUpdatePlugin::new();
        let mut values = values_from([("automation_name", "app-automation")]);
        let mut prompter = ScriptedPrompter::new([
            // repository
            Answer::text("app"),
            Answer::text("ghcr.io/acme/app"),
            Answer::Default,
            Answer::text("regcred"),
            // policy
            Answer::text("app-policy"),
            Answer::Default,
            Answer::Select(1),
            // automation
            Answer::Default,
            Answer::Default,
            Answer::text("./apps/app"),
            Answer::Default,
            Answer::Default,
            Answer::Default,
            Answer::Select(0),
        ]);

        plugin
            .as_custom_config()
            .expect("custom config")
            .collect_custom_config(&mut values, &mut prompter)?;
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(prompter.sections.len(), 3);

        let repositories: Vec<ImageRepository> =
            serde_json::from_str(text_value(&values, REPOSITORIES_KEY).unwrap_or_default())?;
        assert_eq!(repositories.len(), 1);
        assert_eq!(repositories[0].interval, "6h");
        assert_eq!(repositories[0].secret_ref, "regcred");

        let policies: Vec<ImagePolicy> =
            serde_json::from_str(text_value(&values, POLICIES_KEY).unwrap_or_default())?;
        assert_eq!(policies[0].repository, "app");
        assert_eq!(policies[0].policy_type, "numerical");
        assert_eq!(policies[0].extract, "$ts");

        assert_eq!(text_value(&values, "update_path"), Some("./apps/app"));
        assert_eq!(text_value(&values, "git_branch"), Some("main"));
        assert_eq!(text_value(&values, "automation_interval"), Some("5m"));
        assert_eq!(text_value(&values, "update_strategy"), Some("Setters"));
        assert!(plugin.validate(&values).is_ok());
        Ok(())
    }

    #[test]
    fn test_custom_config_semver_asks_range() -> anyhow::Result<()> {
        let plugin = ImageUpdatePlugin::new();
        let mut values = values_from([("automation_name", "app-automation")]);
        let mut answers = vec![
            Answer::text("app"),
            Answer::text("nginx"),
            Answer::Select(0),
            Answer::Default,
            Answer::text("app-policy"),
            Answer::text("other-repo"),
            Answer::Default,
            Answer::Select(1),
        ];
        answers.extend(std::iter::repeat(Answer::Default).take(7));
        let mut prompter = ScriptedPrompter::new(answers);

        plugin.collect_custom_config(&mut values, &mut prompter)?;

        let policies: Vec<ImagePolicy> =
            serde_json::from_str(text_value(&values, POLICIES_KEY).unwrap_or_default())?;
        assert_eq!(policies[0].policy_type, "semver");
        assert_eq!(policies[0].range, "^1.0.0");
        assert_eq!(policies[0].repository, "other-repo");
        assert_eq!(text_value(&values, "automation_interval"), Some("10m"));
        Ok(())
    }

    #[test]
    fn test_custom_config_error_names_step() {
        let plugin = ImageUpdatePlugin::new();
        let mut values = PluginValues::new();
        let mut prompter = ScriptedPrompter::new([Answer::text("app")]);

        let err = plugin
            .collect_custom_config(&mut values, &mut prompter)
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to configure image repository");
        assert!(values.is_empty());
    }
}
