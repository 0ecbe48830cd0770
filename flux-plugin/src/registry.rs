//! Name-keyed collection of plugins.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::RegistryError;
use crate::lister::ClusterLister;
use crate::plugin::Plugin;
use crate::plugins::{ExternalSecretPlugin, ImageUpdatePlugin};
use crate::render::error_chain;
use crate::variable::validate_schema;

/// Read-only lookup of registered plugins.
pub struct Registry {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
}

impl Registry {
    /// Registry with every built-in plugin.
    ///
    /// # Panics
    ///
    /// If two built-ins share a name or a built-in declares an invalid schema.
    pub fn new(lister: Option<Arc<dyn ClusterLister>>) -> Self {
        let mut builder = RegistryBuilder::default();
        if let Err(e) = builder.with_builtins(lister) {
            panic!("built-in plugin registration failed: {}", error_chain(&e));
        }
        builder.build()
    }

    /// Start an empty registry for ad hoc plugins.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// All plugins, sorted by name.
    pub fn list(&self) -> Vec<&dyn Plugin> {
        self.plugins.values().map(|p| p.as_ref()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Mutable construction path for a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
}

impl RegistryBuilder {
    /// Add a plugin. On error the builder is left unchanged.
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), RegistryError> {
        let name = plugin.name().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.plugins.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        validate_schema(plugin.variables()).map_err(|source| RegistryError::InvalidSchema {
            plugin: name.clone(),
            source,
        })?;

        debug!(plugin = %name, "Registered plugin");
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Register the built-in plugins.
    pub fn with_builtins(
        &mut self,
        lister: Option<Arc<dyn ClusterLister>>,
    ) -> Result<&mut Self, RegistryError> {
        self.register(Arc::new(ExternalSecretPlugin::new(lister)))?;
        self.register(Arc::new(ImageUpdatePlugin::new()))?;
        Ok(self)
    }

    pub fn build(self) -> Registry {
        debug!(plugins = self.plugins.len(), "Plugin registry ready");
        Registry {
            plugins: self.plugins,
        }
    }
}
