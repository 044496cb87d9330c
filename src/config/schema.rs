//! Configuration schema definitions

use super::defaults::DEFAULT_KUBECTL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// kubectl binary name or path
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    /// Kubeconfig file; kubectl's own lookup applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context; the current context when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Namespace used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,

    /// Directory holding `.kubectl.tmp` copies of edited files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_root: Option<PathBuf>,

    /// Image with an `/nsenter` binary, for node shells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsenter_image: Option<String>,

    /// Favorites state file (defaults to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            kubeconfig: None,
            context: None,
            default_namespace: None,
            staging_root: None,
            nsenter_image: None,
            favorites_file: None,
        }
    }
}

fn default_kubectl() -> String {
    DEFAULT_KUBECTL.to_string()
}
