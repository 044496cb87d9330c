//! Durable key-value state
//!
//! Favorites are the only durable state of the explorer. They live in a
//! process-wide store keyed by scope, each value an ordered list of strings.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Persistence interface: `get(key)` and `update(key, values)`
pub trait StateStore: Send + Sync {
    /// Values stored under `key`, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<Vec<String>>>;

    /// Replace the values stored under `key`
    fn update(&self, key: &str, values: Vec<String>) -> Result<()>;
}

/// In-memory store; state is lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let state = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("State store lock poisoned"))?;
        Ok(state.get(key).cloned())
    }

    fn update(&self, key: &str, values: Vec<String>) -> Result<()> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("State store lock poisoned"))?;
        state.insert(key.to_string(), values);
        Ok(())
    }
}

/// YAML file backed store that survives restarts
///
/// Every update rewrites the whole file through a temporary file in the same
/// directory, so a crash never leaves a half-written state file behind.
///
/// Reads and writes are blocking `std::fs` calls. The file holds a handful of
/// paths per pod, so callers on an async runtime use it inline; a host with a
/// slow or networked state directory should wrap store calls in
/// [`tokio::task::spawn_blocking`].
#[derive(Debug)]
pub struct YamlStateStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl YamlStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Vec<String>>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }

    fn save(&self, state: &BTreeMap<String, Vec<String>>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        crate::config::paths::ensure_dir(&dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

        let yaml = serde_yaml::to_string(state).context("Failed to serialize state to YAML")?;

        let mut file = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        file.write_all(yaml.as_bytes())
            .context("Failed to write state")?;
        file.persist(&self.path)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        tracing::debug!("State written to {}", self.path.display());
        Ok(())
    }
}

impl StateStore for YamlStateStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| anyhow::anyhow!("State file lock poisoned"))?;
        Ok(self.load()?.remove(key))
    }

    fn update(&self, key: &str, values: Vec<String>) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| anyhow::anyhow!("State file lock poisoned"))?;
        let mut state = self.load()?;
        state.insert(key.to_string(), values);
        self.save(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_absent_key() {
        let store = MemoryStateStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_yaml_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.yaml");

        let store = YamlStateStore::new(&path);
        store
            .update(
                "shop_web-0_favorites",
                vec!["/etc/hosts\0containerfilenodefavorite".to_string()],
            )
            .unwrap();
        store
            .update("###GLOBAL###_favorites", vec!["/tmp/\0containerfoldernodefavorite".to_string()])
            .unwrap();

        let reopened = YamlStateStore::new(&path);
        assert_eq!(
            reopened.get("shop_web-0_favorites").unwrap(),
            Some(vec!["/etc/hosts\0containerfilenodefavorite".to_string()])
        );
        assert_eq!(
            reopened.get("###GLOBAL###_favorites").unwrap().map(|v| v.len()),
            Some(1)
        );
        assert_eq!(reopened.get("other").unwrap(), None);
    }

    #[test]
    fn test_yaml_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlStateStore::new(dir.path().join("absent.yaml"));
        assert_eq!(store.get("any").unwrap(), None);
    }

    #[test]
    fn test_yaml_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.yaml");
        std::fs::write(&path, "{not: [valid").unwrap();
        assert!(YamlStateStore::new(&path).get("any").is_err());
    }
}
