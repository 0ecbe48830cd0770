//! ExternalSecret manifests backed by an external secret store.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::lister::ClusterLister;
use crate::plugin::{BasePlugin, Plugin};
use crate::value::{text_value, PluginValues};
use crate::variable::Variable;

pub const NAME: &str = "externalsecret";

pub const CLUSTER_SECRET_STORE: &str = "ClusterSecretStore";
pub const SECRET_STORE: &str = "SecretStore";

const TEMPLATE: &str = include_str!("../../templates/external-secret.yaml.tera");
const FILE_PATH: &str = "dependencies/external-secret-{{ target_secret_name }}.yaml";

/// Emits one `ExternalSecret` per instance. Store names can be suggested
/// from the cluster when a lister is available.
pub struct ExternalSecretPlugin {
    base: BasePlugin,
    lister: Option<Arc<dyn ClusterLister>>,
}

impl ExternalSecretPlugin {
    pub fn new(lister: Option<Arc<dyn ClusterLister>>) -> Self {
        let variables = vec![
            Variable::text("name", "Name for the ExternalSecret resource").required(),
            Variable::select(
                "secret_store_type",
                "Type of secret store to reference",
                [
                    ("Cluster Secret Store", CLUSTER_SECRET_STORE),
                    ("Secret Store", SECRET_STORE),
                ],
            )
            .required()
            .with_default(CLUSTER_SECRET_STORE),
            Variable::text("secret_store_name", "Name of the secret store resource").required(),
            Variable::text("secret_key", "Key name in the external secret store").required(),
            Variable::text("target_secret_name", "Name of the Kubernetes secret to create")
                .required(),
            Variable::select(
                "refresh_interval",
                "How often to refresh the secret",
                [
                    ("15 minutes", "15m"),
                    ("30 minutes", "30m"),
                    ("1 hour", "60m"),
                    ("2 hours", "120m"),
                    ("6 hours", "6h"),
                    ("12 hours", "12h"),
                    ("24 hours", "24h"),
                ],
            )
            .with_default("60m"),
        ];

        Self {
            base: BasePlugin::new(
                NAME,
                "Generates ExternalSecret resources for managing secrets from external secret stores",
                variables,
                TEMPLATE,
                FILE_PATH,
            ),
            lister,
        }
    }

    fn list_stores(&self, store_type: &str, namespace: &str) -> Option<Vec<String>> {
        let lister = self.lister.as_ref()?;
        let result = if store_type == CLUSTER_SECRET_STORE {
            lister.cluster_secret_stores()
        } else {
            lister.secret_stores(namespace)
        };

        match result {
            Ok(names) if names.is_empty() => {
                debug!(store_type, namespace, "No secret stores found, using manual entry");
                None
            }
            Ok(names) => Some(names),
            Err(e) => {
                warn!(
                    store_type,
                    namespace,
                    error = %format!("{e:#}"),
                    "Failed to list secret stores, using manual entry"
                );
                None
            }
        }
    }
}

impl Default for ExternalSecretPlugin {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Plugin for ExternalSecretPlugin {
    fn base(&self) -> &BasePlugin {
        &self.base
    }

    fn suggestions(
        &self,
        variable: &str,
        values: &PluginValues,
        namespace: &str,
    ) -> Option<Vec<String>> {
        if variable != "secret_store_name" {
            return None;
        }
        let store_type = text_value(values, "secret_store_type").unwrap_or(CLUSTER_SECRET_STORE);
        self.list_stores(store_type, namespace)
    }

    fn instance_label(&self, values: &PluginValues) -> String {
        ["target_secret_name", "name"]
            .iter()
            .filter_map(|key| text_value(values, key))
            .find(|s| !s.is_empty())
            .unwrap_or("configured")
            .to_string()
    }
}
