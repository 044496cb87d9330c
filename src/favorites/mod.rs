//! Favorites: bookmarked files and folders
//!
//! Favorites are persisted per scope (namespace + pod, pod, or global) in a
//! [`StateStore`] and merged back into a favorites group node when the tree is
//! rendered.

mod entry;
mod resolver;
mod state;
mod store;

pub use entry::{
    FAVORITES_SUFFIX, FavoriteEntry, FavoriteEntryError, FavoriteKind, FavoriteScope,
    GLOBAL_SCOPE, ScopeKey,
};
pub use resolver::resolve_favorites;
pub use state::{MemoryStateStore, StateStore, YamlStateStore};
pub use store::{AddOutcome, FavoritesStore};
