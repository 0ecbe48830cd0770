// Cluster lookups through the kubectl binary

use anyhow::{anyhow, Context, Result};
use duct::cmd;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use flux_messages::MESSAGES;
use flux_plugin::ClusterLister;

const CLUSTER_SECRET_STORES: &str = "clustersecretstores.external-secrets.io";
const SECRET_STORES: &str = "secretstores.external-secrets.io";
const REQUEST_TIMEOUT: &str = "--request-timeout=5s";

/// Lists namespaces and External Secrets stores with the user's current
/// kubeconfig context.
pub struct KubectlLister {
    kubectl: PathBuf,
}

impl KubectlLister {
    pub fn detect() -> Result<Self> {
        let kubectl = which::which("kubectl").context("kubectl not found in PATH")?;
        debug!(path = %kubectl.display(), "Found kubectl");
        Ok(Self { kubectl })
    }

    /// Ask the API server for its readiness endpoint.
    pub fn probe(&self) -> Result<()> {
        self.run(&["get", "--raw", "/readyz", REQUEST_TIMEOUT])?;
        Ok(())
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = cmd(&self.kubectl, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .with_context(|| format!("Failed to run kubectl {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("kubectl {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list(&self, args: &[&str]) -> Result<Vec<String>> {
        let stdout = self.run(args)?;
        let names = parse_names(&stdout);
        debug!(resource = args[1], count = names.len(), "Listed cluster resources");
        Ok(names)
    }
}

impl ClusterLister for KubectlLister {
    fn cluster_secret_stores(&self) -> Result<Vec<String>> {
        self.list(&["get", CLUSTER_SECRET_STORES, "-o", "name", REQUEST_TIMEOUT])
    }

    fn secret_stores(&self, namespace: &str) -> Result<Vec<String>> {
        self.list(&[
            "get",
            SECRET_STORES,
            "-n",
            namespace,
            "-o",
            "name",
            REQUEST_TIMEOUT,
        ])
    }

    fn namespaces(&self) -> Result<Vec<String>> {
        self.list(&["get", "namespaces", "-o", "name", REQUEST_TIMEOUT])
    }
}

/// Names from `kubectl get -o name` output (`kind.group/name` per line).
fn parse_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.rsplit('/').next())
        .map(str::to_string)
        .collect()
}

/// Pick the lister for an interactive session, reporting what happened.
///
/// Any failure leaves cluster assistance off; the prompts fall back to manual
/// entry.
pub fn connect(no_cluster: bool) -> Option<Arc<dyn ClusterLister>> {
    if no_cluster {
        println!("{}", MESSAGES.plugin.cluster_disabled);
        return None;
    }

    println!("{}", MESSAGES.plugin.cluster_probe);
    match KubectlLister::detect().and_then(|lister| lister.probe().map(|()| lister)) {
        Ok(lister) => {
            println!("{}", MESSAGES.plugin.cluster_connected);
            Some(Arc::new(lister))
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Cluster unavailable");
            println!("{}", MESSAGES.plugin.cluster_unavailable);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_strips_kind_prefix() {
        let output = "clustersecretstore.external-secrets.io/vault-backend\n\
                      clustersecretstore.external-secrets.io/aws-secrets\n\n";
        assert_eq!(parse_names(output), ["vault-backend", "aws-secrets"]);
        assert_eq!(
            parse_names("namespace/default\nnamespace/monitoring\n"),
            ["default", "monitoring"]
        );
    }

    #[test]
    fn test_parse_names_handles_bare_names_and_blank_output() {
        assert_eq!(parse_names("  local-store  \r\n"), ["local-store"]);
        assert!(parse_names("").is_empty());
        assert!(parse_names("\n\n").is_empty());
    }

    #[test]
    fn test_connect_disabled_returns_none() {
        assert!(connect(true).is_none());
    }
}
