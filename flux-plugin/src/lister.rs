//! Read-only access to resources that already exist in the cluster.

use anyhow::Result;

/// Enumerates existing namespaces and secret store names so a form can offer
/// a choice instead of free text.
///
/// Every caller must treat an `Err` the same as a missing lister: fall back
/// to manual entry.
pub trait ClusterLister: Send + Sync {
    /// Names of cluster-scoped `ClusterSecretStore` resources.
    fn cluster_secret_stores(&self) -> Result<Vec<String>>;

    /// Names of `SecretStore` resources in `namespace`.
    fn secret_stores(&self, namespace: &str) -> Result<Vec<String>>;

    fn namespaces(&self) -> Result<Vec<String>>;
}

/// A lister answering from fixed lists.
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
    pub cluster_stores: Vec<String>,
    pub namespaced_stores: Vec<(String, String)>,
    pub namespaces: Vec<String>,
}

impl StaticLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster_store(mut self, name: &str) -> Self {
        self.cluster_stores.push(name.to_string());
        self
    }

    pub fn with_namespace(mut self, name: &str) -> Self {
        self.namespaces.push(name.to_string());
        self
    }

    pub fn with_store(mut self, namespace: &str, name: &str) -> Self {
        self.namespaced_stores
            .push((namespace.to_string(), name.to_string()));
        self
    }
}

impl ClusterLister for StaticLister {
    fn cluster_secret_stores(&self) -> Result<Vec<String>> {
        Ok(self.cluster_stores.clone())
    }

    fn secret_stores(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .namespaced_stores
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        Ok(self.namespaces.clone())
    }
}
