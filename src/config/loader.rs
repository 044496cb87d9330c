//! Configuration loading and merging logic
//!
//! Precedence order (highest to lowest):
//! 1. Environment variable overrides
//! 2. Root config file
//! 3. Built-in defaults

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    pub fn load() -> Result<Config> {
        let mut config = Self::load_defaults();

        let root_path = paths::root_config_path();
        if root_path.exists() {
            let root_config = Self::load_file(&root_path)?;
            config = Self::merge_config(config, root_config);
        }

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the root config file, if any
    ///
    /// Fails on invalid YAML, unknown keys, wrong value types, and paths
    /// that are set but unusable.
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if !root_path.exists() {
            return Ok(());
        }

        let config = Self::load_file(&root_path)?;
        if config.kubectl.trim().is_empty() {
            return Err(anyhow::anyhow!("kubectl must not be empty"));
        }
        if let Some(kubeconfig) = &config.kubeconfig
            && !kubeconfig.is_file()
        {
            return Err(anyhow::anyhow!(
                "kubeconfig {} does not exist",
                kubeconfig.display()
            ));
        }
        if let Some(root) = &config.staging_root
            && root.exists()
            && !root.is_dir()
        {
            return Err(anyhow::anyhow!(
                "stagingRoot {} is not a directory",
                root.display()
            ));
        }

        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Merge two configurations, with values set in `other` taking precedence
    fn merge_config(base: Config, other: Config) -> Config {
        Config {
            kubectl: other.kubectl,
            kubeconfig: other.kubeconfig.or(base.kubeconfig),
            context: other.context.or(base.context),
            default_namespace: other.default_namespace.or(base.default_namespace),
            staging_root: other.staging_root.or(base.staging_root),
            nsenter_image: other.nsenter_image.or(base.nsenter_image),
            favorites_file: other.favorites_file.or(base.favorites_file),
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(kubectl) = std::env::var("PODFS_KUBECTL") {
            config.kubectl = kubectl;
        }

        if let Ok(namespace) = std::env::var("PODFS_NAMESPACE") {
            config.default_namespace = Some(namespace);
        }

        if let Ok(root) = std::env::var("PODFS_STAGING_ROOT") {
            config.staging_root = Some(PathBuf::from(root));
        }

        if let Ok(image) = std::env::var("PODFS_NSENTER_IMAGE") {
            config.nsenter_image = Some(image);
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }

    /// Favorites state file for a loaded configuration
    pub fn favorites_path(config: &Config) -> PathBuf {
        config
            .favorites_file
            .clone()
            .unwrap_or_else(paths::favorites_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_values() {
        let base = Config {
            context: Some("prod".to_string()),
            ..Default::default()
        };
        let other = Config {
            default_namespace: Some("shop".to_string()),
            ..Default::default()
        };

        let merged = ConfigLoader::merge_config(base, other);
        assert_eq!(merged.context.as_deref(), Some("prod"));
        assert_eq!(merged.default_namespace.as_deref(), Some("shop"));
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: set_var is unsafe in Rust 2024; no other test reads these
        // variables.
        unsafe {
            std::env::set_var("PODFS_STAGING_ROOT", "/tmp/podfs-staging");
            std::env::set_var("PODFS_NSENTER_IMAGE", "alexeiled/nsenter");
        }

        let config = ConfigLoader::apply_env_overrides(Config::default());

        assert_eq!(
            config.staging_root,
            Some(PathBuf::from("/tmp/podfs-staging"))
        );
        assert_eq!(config.nsenter_image.as_deref(), Some("alexeiled/nsenter"));

        // SAFETY: see above
        unsafe {
            std::env::remove_var("PODFS_STAGING_ROOT");
            std::env::remove_var("PODFS_NSENTER_IMAGE");
        }
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            staging_root: Some(PathBuf::from("/work")),
            ..Default::default()
        };

        ConfigLoader::save(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_file(&dir.path().join("none.yaml")).is_err());
    }
}
