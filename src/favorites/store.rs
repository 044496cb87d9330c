//! Favorites store: add, remove and list per scope key

use super::entry::{FavoriteEntry, FavoriteKind, ScopeKey};
use super::state::StateStore;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Result of adding a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The path is already a favorite in this scope; nothing was written
    Duplicate,
}

/// Favorites persisted in a [`StateStore`], one ordered list per scope key
///
/// Read-modify-write sequences are not atomic against other writers of the
/// same store; the last writer wins.
#[derive(Clone)]
pub struct FavoritesStore {
    state: Arc<dyn StateStore>,
}

impl FavoritesStore {
    pub fn new(state: Arc<dyn StateStore>) -> Self {
        Self { state }
    }

    fn raw(&self, key: &ScopeKey) -> Result<Vec<String>> {
        Ok(self
            .state
            .get(key.as_str())
            .with_context(|| format!("Failed to read favorites for {key}"))?
            .unwrap_or_default())
    }

    /// Append `path` to the scope unless an entry with that path exists
    pub fn add(&self, key: &ScopeKey, path: &str, kind: FavoriteKind) -> Result<AddOutcome> {
        let mut favorites = self.raw(key)?;
        let duplicate = favorites
            .iter()
            .filter_map(|raw| FavoriteEntry::decode(raw).ok())
            .any(|entry| entry.matches_path(path));
        if duplicate {
            tracing::debug!("{} is already a favorite in {}", path, key);
            return Ok(AddOutcome::Duplicate);
        }

        favorites.push(FavoriteEntry::new(path, kind).encode());
        self.state
            .update(key.as_str(), favorites)
            .with_context(|| format!("Failed to save favorites for {key}"))?;
        tracing::info!("Added favorite {} to {}", path, key);
        Ok(AddOutcome::Added)
    }

    /// Drop every entry for `path` from the scope; returns how many were removed
    pub fn remove(&self, key: &ScopeKey, path: &str) -> Result<usize> {
        let favorites = self.raw(key)?;
        let before = favorites.len();
        let kept = favorites
            .into_iter()
            .filter(|raw| match FavoriteEntry::decode(raw) {
                Ok(entry) => !entry.matches_path(path),
                Err(_) => true,
            })
            .collect::<Vec<_>>();
        let removed = before - kept.len();

        self.state
            .update(key.as_str(), kept)
            .with_context(|| format!("Failed to save favorites for {key}"))?;
        tracing::info!("Removed {} favorite(s) for {} from {}", removed, path, key);
        Ok(removed)
    }

    /// Entries of one scope in insertion order; malformed entries are skipped
    pub fn list(&self, key: &ScopeKey) -> Result<Vec<FavoriteEntry>> {
        Ok(self
            .raw(key)?
            .iter()
            .filter_map(|raw| match FavoriteEntry::decode(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping favorite in {}: {}", key, e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::entry::FavoriteScope;
    use crate::favorites::state::MemoryStateStore;
    use crate::kube::PodContext;

    fn store() -> (FavoritesStore, Arc<MemoryStateStore>) {
        let state = Arc::new(MemoryStateStore::new());
        (FavoritesStore::new(state.clone()), state)
    }

    fn key() -> ScopeKey {
        ScopeKey::for_scope(FavoriteScope::Explicit, &PodContext::new("web-0", "shop"))
    }

    #[test]
    fn test_add_persists_encoded_entry() {
        let (favorites, state) = store();
        assert_eq!(
            favorites
                .add(&key(), "/etc/hosts", FavoriteKind::File)
                .unwrap(),
            AddOutcome::Added
        );
        assert_eq!(
            state.get("shop_web-0_favorites").unwrap(),
            Some(vec!["/etc/hosts\0containerfilenodefavorite".to_string()])
        );
    }

    #[test]
    fn test_duplicate_add_does_not_write() {
        let (favorites, _) = store();
        favorites
            .add(&key(), "/var/log/", FavoriteKind::Folder)
            .unwrap();
        assert_eq!(
            favorites
                .add(&key(), "/var/log/", FavoriteKind::Folder)
                .unwrap(),
            AddOutcome::Duplicate
        );
        assert_eq!(favorites.list(&key()).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_unknown_path_is_noop() {
        let (favorites, _) = store();
        favorites
            .add(&key(), "/etc/hosts", FavoriteKind::File)
            .unwrap();
        assert_eq!(favorites.remove(&key(), "/etc/passwd").unwrap(), 0);
        assert_eq!(favorites.list(&key()).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_from_empty_scope() {
        let (favorites, _) = store();
        assert_eq!(favorites.remove(&key(), "/etc/passwd").unwrap(), 0);
        assert!(favorites.list(&key()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_drops_every_matching_entry() {
        let (favorites, state) = store();
        state
            .update(
                key().as_str(),
                vec![
                    "/etc/hosts\0containerfilenodefavorite".to_string(),
                    "/etc/hosts".to_string(),
                    "/tmp/\0containerfoldernodefavorite".to_string(),
                ],
            )
            .unwrap();

        assert_eq!(favorites.remove(&key(), "/etc/hosts").unwrap(), 2);
        let remaining = favorites.list(&key()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].path, "/tmp/");
    }

    #[test]
    fn test_list_skips_malformed_entries() {
        let (favorites, state) = store();
        state
            .update(
                key().as_str(),
                vec![
                    String::new(),
                    "/etc/hosts\0containerfilenodefavorite".to_string(),
                ],
            )
            .unwrap();
        assert_eq!(favorites.list(&key()).unwrap().len(), 1);
    }
}
