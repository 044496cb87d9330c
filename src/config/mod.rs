//! Configuration for podfs
//!
//! A single YAML file with environment overrides on top. Keys are addressed
//! by their camelCase names from the CLI.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: [&str; 7] = [
    "kubectl",
    "kubeconfig",
    "context",
    "defaultNamespace",
    "stagingRoot",
    "nsenterImage",
    "favoritesFile",
];

/// Get a configuration value by key
pub fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let display_path = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    };
    match key {
        "kubectl" => Ok(config.kubectl.clone()),
        "kubeconfig" => Ok(display_path(&config.kubeconfig)),
        "context" => Ok(config.context.clone().unwrap_or_default()),
        "defaultNamespace" => Ok(config.default_namespace.clone().unwrap_or_default()),
        "stagingRoot" => Ok(display_path(&config.staging_root)),
        "nsenterImage" => Ok(config.nsenter_image.clone().unwrap_or_default()),
        "favoritesFile" => Ok(display_path(&config.favorites_file)),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key; an empty value unsets optional keys
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
    match key {
        "kubectl" => {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("kubectl must not be empty"));
            }
            config.kubectl = value.to_string();
        }
        "kubeconfig" => config.kubeconfig = optional(value).map(PathBuf::from),
        "context" => config.context = optional(value),
        "defaultNamespace" => config.default_namespace = optional(value),
        "stagingRoot" => {
            config.staging_root = optional(value)
                .map(|root| std::path::absolute(&root))
                .transpose()
                .context("stagingRoot must be a valid path")?;
        }
        "nsenterImage" => config.nsenter_image = optional(value),
        "favoritesFile" => config.favorites_file = optional(value).map(PathBuf::from),
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_round_trips() {
        let mut config = Config::default();
        for key in CONFIG_KEYS {
            set_config_value(&mut config, key, "/x").unwrap();
            assert_eq!(get_config_value(&config, key).unwrap(), "/x", "{key}");
        }
    }

    #[test]
    fn test_empty_value_unsets() {
        let mut config = Config::default();
        set_config_value(&mut config, "nsenterImage", "alexeiled/nsenter").unwrap();
        set_config_value(&mut config, "nsenterImage", "").unwrap();
        assert_eq!(config.nsenter_image, None);
        assert!(set_config_value(&mut config, "kubectl", "").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(get_config_value(&config, "readOnly").is_err());
        assert!(set_config_value(&mut config, "readOnly", "true").is_err());
    }
}
