//! Tree node model
//!
//! Maps a live pod (containers, volumes and volume mounts) onto a lazily
//! expanded tree of nodes the host can render.

mod discovery;
mod listing;
mod node;

pub use discovery::{build_pod_nodes, container_children, discover_pod, parse_statuses, status_text};
pub use listing::{ListingEntry, children_from_listing, parse_listing};
pub use node::{
    Collapsible, ContainerNode, ContainerRef, FavoritesGroup, FsEntry, Icon, MOUNTED_SUFFIX, Node,
    NodeTag, StatusNode, TreeItem, VolumeMountNode, VolumeNode, strip_type_markers,
};
