//! Explorer session
//!
//! [`Explorer`] owns everything a host needs for one editor session: the
//! executor, the favorites store, the staging area and the notification sink.
//! Every operation on a node dispatches with an exhaustive match on [`Node`].

use crate::content::{ContentProvider, DocumentMode, DocumentUri};
use crate::favorites::{AddOutcome, FavoriteScope, FavoritesStore, ScopeKey, resolve_favorites};
use crate::kube::{CommandExecutor, PodContext, commands};
use crate::notify::{Notice, Notifier};
use crate::staging::{RemoteFile, SaveOutcome, StagingArea};
use crate::tree::{FsEntry, Node, children_from_listing, container_children, discover_pod};
use k8s_openapi::api::core::v1::Node as ClusterNode;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";

/// Contextual action a host can offer on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Edit,
    Tail,
    Find,
    ListAll,
    Shell,
    CopyFrom,
    CopyTo,
    AddFavorite,
    RemoveFavorite,
}

impl Action {
    pub fn title(self) -> &'static str {
        match self {
            Self::View => "View file",
            Self::Edit => "Edit file",
            Self::Tail => "Tail file",
            Self::Find => "Find",
            Self::ListAll => "List (ls -al)",
            Self::Shell => "Open shell",
            Self::CopyFrom => "Copy from pod",
            Self::CopyTo => "Copy to pod",
            Self::AddFavorite => "Add to favorites",
            Self::RemoveFavorite => "Remove from favorites",
        }
    }
}

/// Actions that apply to a node
pub fn actions(node: &Node) -> Vec<Action> {
    match node {
        Node::Folder(entry) => {
            let mut actions = vec![
                Action::Find,
                Action::ListAll,
                Action::Shell,
                Action::CopyFrom,
                Action::CopyTo,
                Action::AddFavorite,
            ];
            if entry.favorite_key.is_some() {
                actions.push(Action::RemoveFavorite);
            }
            actions
        }
        Node::File(entry) => {
            let mut actions = vec![
                Action::View,
                Action::Edit,
                Action::Tail,
                Action::CopyFrom,
                Action::AddFavorite,
            ];
            if entry.favorite_key.is_some() {
                actions.push(Action::RemoveFavorite);
            }
            actions
        }
        Node::Container(_) => vec![Action::Shell],
        Node::Volume(_) | Node::VolumeMount(_) | Node::ContainerStatus(_) | Node::Favorites(_) => {
            Vec::new()
        }
    }
}

/// Virtual document for a node, if the mode applies to it
///
/// Files can only be viewed; folders can be searched or listed.
pub fn document_for(node: &Node, mode: DocumentMode) -> Option<DocumentUri> {
    match (node, mode) {
        (Node::File(entry), DocumentMode::View) => Some(DocumentUri::new(
            mode,
            entry.target.clone(),
            entry.full_path(),
        )),
        (Node::Folder(entry), DocumentMode::Find | DocumentMode::ListAll) => Some(
            DocumentUri::new(mode, entry.target.clone(), entry.child_prefix()),
        ),
        (Node::File(_), DocumentMode::Find | DocumentMode::ListAll)
        | (Node::Folder(_), DocumentMode::View)
        | (
            Node::Volume(_)
            | Node::VolumeMount(_)
            | Node::ContainerStatus(_)
            | Node::Container(_)
            | Node::Favorites(_),
            _,
        ) => None,
    }
}

/// Interactive shell command line for a container or folder
pub fn shell_command(node: &Node) -> Option<String> {
    match node {
        Node::Container(container) => Some(commands::shell(&container.target(), None)),
        Node::Folder(entry) => Some(commands::shell(&entry.target, Some(&entry.child_prefix()))),
        Node::File(_)
        | Node::Volume(_)
        | Node::VolumeMount(_)
        | Node::ContainerStatus(_)
        | Node::Favorites(_) => None,
    }
}

/// `tail -f` command line for a file
pub fn tail_command(node: &Node) -> Option<String> {
    match node {
        Node::File(entry) => Some(commands::tail_follow(&entry.target, &entry.full_path())),
        Node::Folder(_)
        | Node::Container(_)
        | Node::Volume(_)
        | Node::VolumeMount(_)
        | Node::ContainerStatus(_)
        | Node::Favorites(_) => None,
    }
}

pub struct Explorer {
    executor: Arc<dyn CommandExecutor>,
    notifier: Arc<dyn Notifier>,
    favorites: FavoritesStore,
    staging: StagingArea,
    content: ContentProvider,
    nsenter_image: Option<String>,
}

impl Explorer {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        notifier: Arc<dyn Notifier>,
        favorites: FavoritesStore,
        staging_root: Option<PathBuf>,
    ) -> Self {
        Self {
            staging: StagingArea::new(staging_root, executor.clone(), notifier.clone()),
            content: ContentProvider::new(executor.clone(), notifier.clone()),
            executor,
            notifier,
            favorites,
            nsenter_image: None,
        }
    }

    /// Image used for node shells
    pub fn with_nsenter_image(mut self, image: Option<String>) -> Self {
        self.nsenter_image = image.filter(|image| !image.is_empty());
        self
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Top-level nodes for a pod
    pub async fn root_children(&self, pod: &PodContext) -> Vec<Node> {
        discover_pod(self.executor.as_ref(), self.notifier.as_ref(), pod).await
    }

    /// Children of an expanded node
    ///
    /// Expanding the favorites group reads the state store synchronously
    /// (see [`crate::favorites::YamlStateStore`]); only folder listings await
    /// the executor.
    pub async fn children(&self, node: &Node) -> Vec<Node> {
        match node {
            Node::Folder(entry) => self.list_folder(entry).await,
            Node::Container(container) => container_children(container),
            Node::Favorites(group) => {
                match resolve_favorites(&self.favorites, &group.target, &group.mount_paths) {
                    Ok(nodes) => nodes,
                    Err(e) => {
                        self.notifier
                            .notify(Notice::error(format!("Can't read favorites: {e:#}")));
                        Vec::new()
                    }
                }
            }
            Node::File(_) | Node::Volume(_) | Node::VolumeMount(_) | Node::ContainerStatus(_) => {
                Vec::new()
            }
        }
    }

    async fn list_folder(&self, entry: &FsEntry) -> Vec<Node> {
        let path = entry.child_prefix();
        let command_line = commands::list_folder(&entry.target, &path);
        match self.executor.invoke(&command_line).await {
            Ok(output) if output.is_success() => children_from_listing(entry, &output.stdout),
            Ok(output) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't list folder {path}: {}",
                    output.stderr.trim()
                )));
                Vec::new()
            }
            Err(e) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't list folder {path}: unable to run kubectl ({e:#})"
                )));
                Vec::new()
            }
        }
    }

    /// Save a file or folder node as a favorite under `scope`
    ///
    /// Returns `None` for nodes that can't be favorites or when the store
    /// failed; both cases are reported.
    pub fn add_favorite(&self, node: &Node, scope: FavoriteScope) -> Option<AddOutcome> {
        let (Some(entry), Some((path, kind))) = (node.fs_entry(), node.favorite_path()) else {
            self.notifier
                .notify(Notice::warning("Only files and folders can be favorites"));
            return None;
        };

        let key = ScopeKey::for_scope(scope, &entry.target.pod);
        match self.favorites.add(&key, &path, kind) {
            Ok(AddOutcome::Added) => {
                self.notifier
                    .notify(Notice::info(format!("Added {path} to favorites")));
                Some(AddOutcome::Added)
            }
            Ok(AddOutcome::Duplicate) => {
                self.notifier.notify(Notice::warning(format!(
                    "{path} is already a favorite ({})",
                    scope.title()
                )));
                Some(AddOutcome::Duplicate)
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error(format!("Can't add {path} to favorites: {e:#}")));
                None
            }
        }
    }

    /// Remove a favorite from the scope it was resolved from
    ///
    /// Returns how many entries were dropped.
    pub fn remove_favorite(&self, node: &Node) -> usize {
        let resolved = node
            .fs_entry()
            .and_then(|entry| entry.favorite_key.clone())
            .zip(node.favorite_path());
        let Some((key, (path, _))) = resolved else {
            self.notifier
                .notify(Notice::warning("Only favorites can be removed from favorites"));
            return 0;
        };

        match self.favorites.remove(&key, &path) {
            Ok(removed) => {
                self.notifier
                    .notify(Notice::info(format!("Removed {path} from favorites")));
                removed
            }
            Err(e) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't remove {path} from favorites: {e:#}"
                )));
                0
            }
        }
    }

    /// Text of a virtual document
    pub async fn provide(&self, uri: &DocumentUri) -> String {
        self.content.provide(uri).await
    }

    /// Stage a file node for editing; returns the local copy
    pub async fn open_for_edit(&self, node: &Node) -> Option<PathBuf> {
        let Node::File(entry) = node else {
            self.notifier.notify(Notice::warning("Only files can be edited"));
            return None;
        };
        let remote = RemoteFile::new(entry.target.clone(), entry.full_path());
        self.staging.stage(&remote).await
    }

    /// Hook for a saved local file; staged copies are copied back
    pub async fn on_saved(&self, local: &Path) -> SaveOutcome {
        self.staging.on_saved(local).await
    }

    /// Copy a file or folder out of the pod into `local_dir`
    pub async fn copy_from(&self, node: &Node, local_dir: &Path) -> Option<PathBuf> {
        let entry = match node {
            Node::File(entry) | Node::Folder(entry) if !entry.is_root() => entry,
            Node::File(_)
            | Node::Folder(_)
            | Node::Volume(_)
            | Node::VolumeMount(_)
            | Node::ContainerStatus(_)
            | Node::Container(_)
            | Node::Favorites(_) => {
                self.notifier
                    .notify(Notice::warning("Only files and folders can be copied"));
                return None;
            }
        };

        let local = local_dir.join(&entry.name);
        let command_line = commands::copy_from_remote(
            &entry.target,
            &entry.full_path(),
            &local.to_string_lossy(),
        );
        self.run_copy(&command_line).await.then_some(local)
    }

    /// Copy a local file into a folder node
    pub async fn copy_to(&self, node: &Node, local_file: &Path) -> Option<String> {
        let Node::Folder(entry) = node else {
            self.notifier
                .notify(Notice::warning("Files can only be copied into folders"));
            return None;
        };
        let Some(file_name) = local_file.file_name().and_then(|name| name.to_str()) else {
            self.notifier.notify(Notice::error(format!(
                "{} has no file name",
                local_file.display()
            )));
            return None;
        };

        let remote = format!("{}{file_name}", entry.child_prefix());
        let command_line =
            commands::copy_to_remote(&entry.target, &local_file.to_string_lossy(), &remote);
        self.run_copy(&command_line).await.then_some(remote)
    }

    async fn run_copy(&self, command_line: &str) -> bool {
        match self.executor.invoke(command_line).await {
            Ok(output) if output.is_success() => true,
            Ok(output) => {
                self.notifier.notify(Notice::error(format!(
                    "kubectl {command_line} failed: {}",
                    output.stderr.trim()
                )));
                false
            }
            Err(e) => {
                self.notifier.notify(Notice::error(format!(
                    "kubectl {command_line} failed: {e:#}"
                )));
                false
            }
        }
    }

    /// Command line for a privileged shell on a cluster node
    pub async fn node_shell_command(&self, node_name: &str) -> Option<String> {
        let Some(image) = &self.nsenter_image else {
            self.notifier.notify(Notice::error(
                "Please configure an nsenter image (nsenterImage) to open node shells",
            ));
            return None;
        };

        let output = match self.executor.invoke(&commands::get_node_json(node_name)).await {
            Ok(output) if output.is_success() => output,
            Ok(output) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't describe node {node_name}: {}",
                    output.stderr.trim()
                )));
                return None;
            }
            Err(e) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't describe node {node_name}: unable to run kubectl ({e:#})"
                )));
                return None;
            }
        };

        let hostname = serde_json::from_str::<ClusterNode>(&output.stdout)
            .ok()
            .and_then(|node| node.metadata.labels)
            .and_then(|mut labels| labels.remove(HOSTNAME_LABEL));
        let Some(hostname) = hostname else {
            self.notifier.notify(Notice::error(format!(
                "Node {node_name} has no {HOSTNAME_LABEL} label"
            )));
            return None;
        };

        Some(commands::nsenter(node_name, &hostname, image))
    }
}
