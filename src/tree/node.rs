//! Tree node variants and their display projection
//!
//! Nodes are plain data recreated on every render. Anything that needs the
//! cluster (children, reads, copies) is dispatched by the
//! [`Explorer`](crate::session::Explorer) with an exhaustive match on [`Node`].

use crate::favorites::{FavoriteKind, ScopeKey};
use crate::kube::{ContainerTarget, PodContext};
use k8s_openapi::api::core::v1::{Volume, VolumeMount};
use std::sync::Arc;

/// Appended to the label of a file or folder that is a volume mount target
pub const MOUNTED_SUFFIX: &str = " [Mounted]";

/// Whether the host should offer to expand a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapsible {
    None,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Folder,
    File,
    Star,
}

/// Type tag the host uses to enable contextual actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Volume,
    VolumeMount,
    ContainerStatus,
    Container,
    Folder,
    FavoriteFolder,
    File,
    FavoriteFile,
    Favorites,
}

impl NodeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Volume => "volumenode",
            Self::VolumeMount => "volumemountnode",
            Self::ContainerStatus => "containernodestatus",
            Self::Container => "containernode",
            Self::Folder => "containerfoldernode",
            Self::FavoriteFolder => "containerfoldernodefavorite",
            Self::File => "containerfilenode",
            Self::FavoriteFile => "containerfilenodefavorite",
            Self::Favorites => "containerfavorite",
        }
    }
}

/// What the host renders for a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub collapsible: Collapsible,
    pub tooltip: String,
    pub icon: Option<Icon>,
    pub tag: NodeTag,
}

/// A container as declared in the pod spec, with its resolved status
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRef {
    pub name: String,
    pub image: String,
    pub is_init: bool,
    /// Free text such as `Running (Started at: ...)` or a termination reason
    pub status: String,
    pub volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeNode {
    pub pod: PodContext,
    pub volume: Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeMountNode {
    pub target: ContainerTarget,
    pub mount: VolumeMount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNode {
    pub target: ContainerTarget,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerNode {
    pub pod: PodContext,
    pub container: ContainerRef,
}

impl ContainerNode {
    pub fn target(&self) -> ContainerTarget {
        self.pod.container(&self.container.name)
    }
}

/// Per-container favorites group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesGroup {
    pub target: ContainerTarget,
    pub mount_paths: Arc<[String]>,
}

/// A remote file or folder
///
/// `prefix` always ends in `/`. `name` is the leaf without the type markers
/// `ls -F` appends (`/`, `@`, `*`); the root folder has an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub target: ContainerTarget,
    pub prefix: String,
    pub name: String,
    /// Mount paths of the owning container, for the mounted annotation
    pub mount_paths: Arc<[String]>,
    /// Scope this entry was resolved from, when it is shown as a favorite
    pub favorite_key: Option<ScopeKey>,
}

impl FsEntry {
    pub fn new(
        target: ContainerTarget,
        prefix: impl Into<String>,
        name: &str,
        mount_paths: Arc<[String]>,
    ) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            target,
            prefix,
            name: strip_type_markers(name).to_string(),
            mount_paths,
            favorite_key: None,
        }
    }

    /// Root folder (`/`) of a container
    pub fn root(target: ContainerTarget, mount_paths: Arc<[String]>) -> Self {
        Self::new(target, "/", "", mount_paths)
    }

    pub fn with_favorite_key(mut self, key: ScopeKey) -> Self {
        self.favorite_key = Some(key);
        self
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Absolute path without a trailing separator (except for the root)
    pub fn full_path(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }

    /// Prefix handed to children of this folder
    pub fn child_prefix(&self) -> String {
        let path = self.full_path();
        if path.ends_with('/') {
            path
        } else {
            format!("{path}/")
        }
    }

    /// Whether this entry is exactly one of the container's mount targets
    pub fn is_mounted(&self) -> bool {
        let path = self.full_path();
        self.mount_paths.iter().any(|mount| *mount == path)
    }

    fn decorated(&self, label: String) -> String {
        if self.is_mounted() {
            format!("{label}{MOUNTED_SUFFIX}")
        } else {
            label
        }
    }
}

/// Strip the symlink (`@`) and executable (`*`) markers from a listing name
pub fn strip_type_markers(name: &str) -> &str {
    let name = name.strip_suffix('@').unwrap_or(name);
    name.strip_suffix('*').unwrap_or(name)
}

/// One node of the explorer tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Volume(VolumeNode),
    VolumeMount(VolumeMountNode),
    ContainerStatus(StatusNode),
    Container(ContainerNode),
    Folder(FsEntry),
    File(FsEntry),
    Favorites(FavoritesGroup),
}

impl Node {
    /// True only for files; used to check whether file actions apply
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// The file or folder behind this node
    pub fn fs_entry(&self) -> Option<&FsEntry> {
        match self {
            Self::Folder(entry) | Self::File(entry) => Some(entry),
            Self::Volume(_)
            | Self::VolumeMount(_)
            | Self::ContainerStatus(_)
            | Self::Container(_)
            | Self::Favorites(_) => None,
        }
    }

    /// Kind and path under which this node would be stored as a favorite
    pub fn favorite_path(&self) -> Option<(String, FavoriteKind)> {
        match self {
            Self::Folder(entry) => Some((entry.child_prefix(), FavoriteKind::Folder)),
            Self::File(entry) => Some((entry.full_path(), FavoriteKind::File)),
            Self::Volume(_)
            | Self::VolumeMount(_)
            | Self::ContainerStatus(_)
            | Self::Container(_)
            | Self::Favorites(_) => None,
        }
    }

    pub fn tree_item(&self) -> TreeItem {
        match self {
            Self::Volume(node) => TreeItem {
                label: format!("Volume: {}", node.volume.name),
                collapsible: Collapsible::None,
                tooltip: pretty_json(&node.volume),
                icon: None,
                tag: NodeTag::Volume,
            },
            Self::VolumeMount(node) => TreeItem {
                label: format!("Volume mount: {}", node.mount.name),
                collapsible: Collapsible::None,
                tooltip: pretty_json(&node.mount),
                icon: None,
                tag: NodeTag::VolumeMount,
            },
            Self::ContainerStatus(node) => TreeItem {
                label: format!("Status: {}", node.status),
                collapsible: Collapsible::None,
                tooltip: node.status.clone(),
                icon: None,
                tag: NodeTag::ContainerStatus,
            },
            Self::Container(node) => {
                let kind = if node.container.is_init {
                    "Init Container"
                } else {
                    "Container"
                };
                let label = format!("{kind}: {} ( {} )", node.container.name, node.container.image);
                let collapsible = if node.container.volume_mounts.is_empty() {
                    Collapsible::None
                } else {
                    Collapsible::Collapsed
                };
                TreeItem {
                    tooltip: label.clone(),
                    label,
                    collapsible,
                    icon: None,
                    tag: NodeTag::Container,
                }
            }
            Self::Folder(entry) => {
                let label = if entry.is_root() {
                    format!("{}:{}", entry.target.container, entry.prefix)
                } else {
                    entry.name.clone()
                };
                let label = entry.decorated(label);
                TreeItem {
                    tooltip: label.clone(),
                    label,
                    collapsible: Collapsible::Collapsed,
                    icon: entry.is_root().then_some(Icon::Folder),
                    tag: if entry.favorite_key.is_some() {
                        NodeTag::FavoriteFolder
                    } else {
                        NodeTag::Folder
                    },
                }
            }
            Self::File(entry) => {
                let label = entry.decorated(entry.name.clone());
                TreeItem {
                    tooltip: format!("{}{}", entry.prefix, label),
                    label,
                    collapsible: Collapsible::None,
                    icon: Some(Icon::File),
                    tag: if entry.favorite_key.is_some() {
                        NodeTag::FavoriteFile
                    } else {
                        NodeTag::File
                    },
                }
            }
            Self::Favorites(_) => TreeItem {
                label: "Favorites".to_string(),
                collapsible: Collapsible::Collapsed,
                tooltip: "Favorites".to_string(),
                icon: Some(Icon::Star),
                tag: NodeTag::Favorites,
            },
        }
    }
}

fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
