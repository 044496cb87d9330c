//! Favorites store and resolution tests
//!
//! Cover the three scopes, duplicate handling, removal, and how stored
//! entries come back as tree nodes, including through the YAML state file.

mod common;

use common::{MockExecutor, notifier, pod, target};
use podfs::favorites::{
    AddOutcome, FavoriteEntry, FavoriteKind, FavoriteScope, FavoritesStore, GLOBAL_SCOPE,
    MemoryStateStore, ScopeKey, StateStore, YamlStateStore, resolve_favorites,
};
use podfs::notify::Severity;
use podfs::tree::{FavoritesGroup, FsEntry, Node, NodeTag};
use podfs::{Action, Explorer};
use std::sync::Arc;

fn memory_store() -> FavoritesStore {
    FavoritesStore::new(Arc::new(MemoryStateStore::new()))
}

fn no_mounts() -> Arc<[String]> {
    Arc::from(Vec::new())
}

fn labels(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|node| node.tree_item().label).collect()
}

#[test]
fn test_scope_keys() {
    let keys = ScopeKey::all_for(&pod());
    assert_eq!(keys[0].as_str(), "shop_web-0_favorites");
    assert_eq!(keys[1].as_str(), "web-0_favorites");
    assert_eq!(keys[2].as_str(), format!("{GLOBAL_SCOPE}_favorites"));
}

#[test]
fn test_add_then_list() {
    let store = memory_store();
    let key = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());

    assert_eq!(
        store
            .add(&key, "/etc/nginx/nginx.conf", FavoriteKind::File)
            .unwrap(),
        AddOutcome::Added
    );
    assert_eq!(
        store.list(&key).unwrap(),
        vec![FavoriteEntry::new(
            "/etc/nginx/nginx.conf",
            FavoriteKind::File
        )]
    );
}

#[test]
fn test_duplicate_add_does_not_write() {
    let state = Arc::new(MemoryStateStore::new());
    let store = FavoritesStore::new(state.clone());
    let key = ScopeKey::for_scope(FavoriteScope::Pod, &pod());

    store.add(&key, "/var/log/", FavoriteKind::Folder).unwrap();
    let before = state.get(key.as_str()).unwrap();
    assert_eq!(
        store.add(&key, "/var/log/", FavoriteKind::Folder).unwrap(),
        AddOutcome::Duplicate
    );
    assert_eq!(state.get(key.as_str()).unwrap(), before);
}

#[test]
fn test_same_path_in_other_scope_is_not_a_duplicate() {
    let store = memory_store();
    let explicit = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());
    let global = ScopeKey::for_scope(FavoriteScope::Global, &pod());

    store.add(&explicit, "/etc/hosts", FavoriteKind::File).unwrap();
    assert_eq!(
        store.add(&global, "/etc/hosts", FavoriteKind::File).unwrap(),
        AddOutcome::Added
    );

    // no cross-scope dedup when resolving either
    let nodes = resolve_favorites(&store, &target(), &no_mounts()).unwrap();
    assert_eq!(labels(&nodes), vec!["hosts", "hosts"]);
}

#[test]
fn test_remove_is_idempotent() {
    let store = memory_store();
    let key = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());

    assert_eq!(store.remove(&key, "/never/added").unwrap(), 0);
    store.add(&key, "/etc/hosts", FavoriteKind::File).unwrap();
    assert_eq!(store.remove(&key, "/etc/hosts").unwrap(), 1);
    assert_eq!(store.remove(&key, "/etc/hosts").unwrap(), 0);
    assert!(store.list(&key).unwrap().is_empty());
}

#[test]
fn test_resolve_sorts_folders_first_then_by_name() {
    let store = memory_store();
    let explicit = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());
    let global = ScopeKey::for_scope(FavoriteScope::Global, &pod());

    store.add(&explicit, "/srv/Zeta.txt", FavoriteKind::File).unwrap();
    store.add(&global, "/srv/alpha.txt", FavoriteKind::File).unwrap();
    store.add(&explicit, "/var/log/", FavoriteKind::Folder).unwrap();
    store.add(&global, "/Data/", FavoriteKind::Folder).unwrap();

    let nodes = resolve_favorites(&store, &target(), &no_mounts()).unwrap();
    assert_eq!(labels(&nodes), vec!["Data", "log", "alpha.txt", "Zeta.txt"]);

    let tags = nodes
        .iter()
        .map(|node| node.tree_item().tag)
        .collect::<Vec<_>>();
    assert_eq!(
        tags,
        vec![
            NodeTag::FavoriteFolder,
            NodeTag::FavoriteFolder,
            NodeTag::FavoriteFile,
            NodeTag::FavoriteFile
        ]
    );
}

#[test]
fn test_resolve_merges_all_three_scopes() {
    let store = memory_store();
    let keys = ScopeKey::all_for(&pod());
    let [explicit, pod_wide, global] = &keys;

    store.add(explicit, "/a.txt", FavoriteKind::File).unwrap();
    store.add(pod_wide, "/B/", FavoriteKind::Folder).unwrap();
    store.add(global, "/c.txt", FavoriteKind::File).unwrap();

    let counts = keys
        .iter()
        .map(|key| store.list(key).unwrap().len())
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![1, 1, 1]);

    let nodes = resolve_favorites(&store, &target(), &no_mounts()).unwrap();
    assert_eq!(nodes.len(), counts.iter().sum::<usize>());
    assert_eq!(labels(&nodes), vec!["B", "a.txt", "c.txt"]);

    // each node remembers the scope it came from
    let scopes = nodes
        .iter()
        .map(|node| match node {
            Node::Folder(entry) | Node::File(entry) => entry.favorite_key.clone(),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        scopes,
        vec![
            Some(pod_wide.clone()),
            Some(explicit.clone()),
            Some(global.clone())
        ]
    );
}

#[test]
fn test_resolved_folder_keeps_prefix_and_scope() {
    let store = memory_store();
    let key = ScopeKey::for_scope(FavoriteScope::Pod, &pod());
    store.add(&key, "/var/log/", FavoriteKind::Folder).unwrap();

    let nodes = resolve_favorites(&store, &target(), &no_mounts()).unwrap();
    let Node::Folder(entry) = &nodes[0] else {
        panic!("expected a folder");
    };
    assert_eq!(entry.prefix, "/var/");
    assert_eq!(entry.name, "log");
    assert_eq!(entry.child_prefix(), "/var/log/");
    assert_eq!(entry.favorite_key.as_ref(), Some(&key));
}

#[test]
fn test_resolved_mount_target_is_annotated() {
    let store = memory_store();
    let key = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());
    store.add(&key, "/data/", FavoriteKind::Folder).unwrap();

    let mounts: Arc<[String]> = Arc::from(vec!["/data".to_string()]);
    let nodes = resolve_favorites(&store, &target(), &mounts).unwrap();
    assert_eq!(labels(&nodes), vec!["data [Mounted]"]);
}

#[test]
fn test_yaml_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("favorites.yaml");
    let key = ScopeKey::for_scope(FavoriteScope::Explicit, &pod());

    let store = FavoritesStore::new(Arc::new(YamlStateStore::new(&path)));
    store.add(&key, "/etc/hosts", FavoriteKind::File).unwrap();
    store.add(&key, "/var/log/", FavoriteKind::Folder).unwrap();

    let reopened = FavoritesStore::new(Arc::new(YamlStateStore::new(&path)));
    let entries = reopened.list(&key).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].kind, FavoriteKind::Folder);
}

#[test]
fn test_explorer_favorite_round_trip() {
    let notifier = notifier();
    let explorer = Explorer::new(
        Arc::new(MockExecutor::new()),
        notifier.clone(),
        memory_store(),
        None,
    );
    let file = Node::File(FsEntry::new(target(), "/etc/", "hosts", no_mounts()));

    explorer.add_favorite(&file, FavoriteScope::Global);
    assert_eq!(notifier.with_severity(Severity::Info).len(), 1);

    let group = Node::Favorites(FavoritesGroup {
        target: target(),
        mount_paths: no_mounts(),
    });
    let resolved = futures::executor::block_on(explorer.children(&group));
    assert_eq!(resolved.len(), 1);
    assert!(podfs::session::actions(&resolved[0]).contains(&Action::RemoveFavorite));

    assert_eq!(explorer.remove_favorite(&resolved[0]), 1);
    assert!(futures::executor::block_on(explorer.children(&group)).is_empty());
}

#[test]
fn test_removing_plain_node_is_rejected() {
    let notifier = notifier();
    let explorer = Explorer::new(
        Arc::new(MockExecutor::new()),
        notifier.clone(),
        memory_store(),
        None,
    );
    let file = Node::File(FsEntry::new(target(), "/etc/", "hosts", no_mounts()));

    assert_eq!(explorer.remove_favorite(&file), 0);
    assert_eq!(notifier.with_severity(Severity::Warning).len(), 1);
}
