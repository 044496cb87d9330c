//! Favorites resolution: merge all three scopes into one child list

use super::entry::{FavoriteKind, ScopeKey};
use super::store::FavoritesStore;
use crate::tree::{FsEntry, Node};
use crate::kube::ContainerTarget;
use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;

/// Children of a favorites group for `target`
///
/// Reads the explicit, pod and global scopes, turns every entry into a file or
/// folder node tagged with the scope it came from, and sorts folders before
/// files, then by case-insensitive name. The same path saved under two scopes
/// shows up twice, once per scope, so each copy can be removed on its own.
pub fn resolve_favorites(
    store: &FavoritesStore,
    target: &ContainerTarget,
    mount_paths: &Arc<[String]>,
) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    for key in ScopeKey::all_for(&target.pod) {
        for entry in store.list(&key)? {
            let (prefix, leaf) = entry.prefix_and_leaf();
            let fs_entry = FsEntry::new(target.clone(), prefix, &leaf, mount_paths.clone())
                .with_favorite_key(key.clone());
            nodes.push(match entry.kind {
                FavoriteKind::File => Node::File(fs_entry),
                FavoriteKind::Folder => Node::Folder(fs_entry),
            });
        }
    }

    nodes.sort_by(compare_favorites);
    Ok(nodes)
}

fn compare_favorites(a: &Node, b: &Node) -> Ordering {
    match (a, b) {
        (Node::Folder(_), Node::File(_)) => Ordering::Less,
        (Node::File(_), Node::Folder(_)) => Ordering::Greater,
        _ => leaf_name(a).cmp(&leaf_name(b)),
    }
}

fn leaf_name(node: &Node) -> String {
    node.fs_entry()
        .map(|entry| entry.name.to_lowercase())
        .unwrap_or_default()
}
