//! Folder listings: `ls -F` output to child nodes

use super::node::{FsEntry, Node, strip_type_markers};
use std::cmp::Ordering;

/// One line of `ls -F` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_folder: bool,
}

/// Parse `ls -F` output into entries, folders first
///
/// Blank lines are dropped, as are lines that hold nothing but a type marker.
/// Within the folder and file partitions the remote order is kept.
pub fn parse_listing(stdout: &str) -> Vec<ListingEntry> {
    let mut entries = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (name, is_folder) = match line.strip_suffix('/') {
                Some(name) => (name, true),
                None => (line, false),
            };
            let name = strip_type_markers(name);
            (!name.is_empty()).then(|| ListingEntry {
                name: name.to_string(),
                is_folder,
            })
        })
        .collect::<Vec<_>>();

    // stable: only the folder/file boundary is enforced
    entries.sort_by(|a, b| match (a.is_folder, b.is_folder) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    });
    entries
}

/// Child nodes of `parent` for a successful listing of it
pub fn children_from_listing(parent: &FsEntry, stdout: &str) -> Vec<Node> {
    let prefix = parent.child_prefix();
    parse_listing(stdout)
        .into_iter()
        .map(|entry| {
            let child = FsEntry::new(
                parent.target.clone(),
                prefix.clone(),
                &entry.name,
                parent.mount_paths.clone(),
            );
            if entry.is_folder {
                Node::Folder(child)
            } else {
                Node::File(child)
            }
        })
        .collect()
}
