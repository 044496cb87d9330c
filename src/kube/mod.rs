//! Cluster access module
//!
//! The explorer never talks to the API server directly: every remote operation
//! is a kubectl command line run through a [`CommandExecutor`]. This module
//! holds that seam, the command-line builders, and the kubeconfig lookups used
//! to pick defaults for the CLI.

pub mod commands;
mod executor;
mod target;

pub use executor::{CommandExecutor, CommandOutput, KubectlExecutor};
#[cfg(test)]
pub use executor::MockCommandExecutor;
pub use target::{ContainerTarget, PodContext};

use kube::config::Kubeconfig;
use std::path::Path;

/// Namespace used when neither flags, config nor kubeconfig name one
pub const FALLBACK_NAMESPACE: &str = "default";

/// Read the kubeconfig from an explicit path, or the standard locations
/// (`KUBECONFIG`, then `~/.kube/config`)
fn read_kubeconfig(path: Option<&Path>) -> Option<Kubeconfig> {
    let result = match path {
        Some(path) => Kubeconfig::read_from(path),
        None => Kubeconfig::read(),
    };
    match result {
        Ok(kubeconfig) => Some(kubeconfig),
        Err(e) => {
            tracing::debug!("No usable kubeconfig: {}", e);
            None
        }
    }
}

/// Get the current Kubernetes context name
///
/// `explicit` wins when given; otherwise the kubeconfig's `current-context`.
pub fn get_context(kubeconfig: Option<&Path>, explicit: Option<&str>) -> Option<String> {
    if let Some(context) = explicit {
        return Some(context.to_string());
    }
    read_kubeconfig(kubeconfig).and_then(|config| config.current_context)
}

/// Get the namespace configured on a kubeconfig context
pub fn get_context_namespace(kubeconfig: Option<&Path>, context: Option<&str>) -> Option<String> {
    let config = read_kubeconfig(kubeconfig)?;
    let context_name = context
        .map(str::to_string)
        .or_else(|| config.current_context.clone())?;
    context_namespace(&config, &context_name)
}

fn context_namespace(config: &Kubeconfig, context_name: &str) -> Option<String> {
    config
        .contexts
        .iter()
        .find(|named| named.name == context_name)
        .and_then(|named| named.context.as_ref())
        .and_then(|context| context.namespace.clone())
        .filter(|namespace| !namespace.is_empty())
}

/// Resolve the namespace to operate in
///
/// Precedence: explicit flag, configured default, kubeconfig context namespace,
/// then [`FALLBACK_NAMESPACE`].
pub fn resolve_namespace(
    explicit: Option<&str>,
    configured: Option<&str>,
    kubeconfig: Option<&Path>,
    context: Option<&str>,
) -> String {
    explicit
        .or(configured)
        .map(str::to_string)
        .or_else(|| get_context_namespace(kubeconfig, context))
        .unwrap_or_else(|| FALLBACK_NAMESPACE.to_string())
}
