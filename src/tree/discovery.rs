//! Pod root discovery
//!
//! Turns a pod into its top-level tree: volumes, containers, and for each
//! regular container a root folder and a favorites group.

use super::node::{
    ContainerNode, ContainerRef, FavoritesGroup, FsEntry, Node, StatusNode, VolumeMountNode,
    VolumeNode,
};
use crate::kube::{CommandExecutor, PodContext, commands};
use crate::notify::{Notice, Notifier};
use k8s_openapi::api::core::v1::{Container, ContainerStatus, Pod};
use std::collections::HashMap;
use std::sync::Arc;

const INIT_CONTAINER_STATUSES: &str = ".status.initContainerStatuses";
const CONTAINER_STATUSES: &str = ".status.containerStatuses";

/// Build the top-level nodes for a pod
///
/// The pod is described once, then both status lists are queried on their
/// own since the description can lack runtime status. A failed description
/// is reported and yields no nodes; a failed status lookup only leaves the
/// status text empty.
pub async fn discover_pod(
    executor: &dyn CommandExecutor,
    notifier: &dyn Notifier,
    pod: &PodContext,
) -> Vec<Node> {
    let Some(description) = describe_pod(executor, notifier, pod).await else {
        return Vec::new();
    };

    let init_statuses = query_statuses(executor, pod, INIT_CONTAINER_STATUSES).await;
    let statuses = query_statuses(executor, pod, CONTAINER_STATUSES).await;

    build_pod_nodes(pod, &description, &init_statuses, &statuses)
}

async fn describe_pod(
    executor: &dyn CommandExecutor,
    notifier: &dyn Notifier,
    pod: &PodContext,
) -> Option<Pod> {
    let output = match executor.invoke(&commands::get_pod_json(pod)).await {
        Ok(output) if output.is_success() => output,
        Ok(output) => {
            notifier.notify(Notice::error(format!(
                "Can't describe pod {pod}: {}",
                output.stderr.trim()
            )));
            return None;
        }
        Err(e) => {
            notifier.notify(Notice::error(format!(
                "Can't describe pod {pod}: unable to run kubectl ({e:#})"
            )));
            return None;
        }
    };

    match serde_json::from_str::<Pod>(&output.stdout) {
        Ok(description) => Some(description),
        Err(e) => {
            notifier.notify(Notice::error(format!(
                "Can't read description of pod {pod}: {e}"
            )));
            None
        }
    }
}

async fn query_statuses(
    executor: &dyn CommandExecutor,
    pod: &PodContext,
    field: &str,
) -> HashMap<String, ContainerStatus> {
    match executor.invoke(&commands::get_pod_jsonpath(pod, field)).await {
        Ok(output) if output.is_success() => parse_statuses(&output.stdout),
        Ok(output) => {
            tracing::debug!("{} lookup for {} failed: {}", field, pod, output.stderr.trim());
            HashMap::new()
        }
        Err(e) => {
            tracing::debug!("{} lookup for {} failed: {:#}", field, pod, e);
            HashMap::new()
        }
    }
}

/// Parse a jsonpath status list; anything unreadable means "no status known"
pub fn parse_statuses(stdout: &str) -> HashMap<String, ContainerStatus> {
    let raw = stdout.trim();
    let raw = raw.strip_prefix('\'').unwrap_or(raw);
    let raw = raw.strip_suffix('\'').unwrap_or(raw);
    if raw.is_empty() {
        return HashMap::new();
    }

    match serde_json::from_str::<Vec<ContainerStatus>>(raw) {
        Ok(statuses) => statuses
            .into_iter()
            .map(|status| (status.name.clone(), status))
            .collect(),
        Err(e) => {
            tracing::debug!("Ignoring unreadable container statuses: {}", e);
            HashMap::new()
        }
    }
}

/// `Running (Started at: ...)`, the termination reason, or empty
pub fn status_text(status: Option<&ContainerStatus>) -> String {
    let Some(state) = status.and_then(|status| status.state.as_ref()) else {
        return String::new();
    };
    if let Some(running) = &state.running {
        return match running
            .started_at
            .as_ref()
            .and_then(|time| serde_json::to_value(time).ok())
            .and_then(|value| value.as_str().map(str::to_string))
        {
            Some(started_at) => format!("Running (Started at: {started_at})"),
            None => "Running".to_string(),
        };
    }
    if let Some(terminated) = &state.terminated {
        return terminated.reason.clone().unwrap_or_default();
    }
    String::new()
}

fn container_ref(
    container: &Container,
    is_init: bool,
    statuses: &HashMap<String, ContainerStatus>,
) -> ContainerRef {
    ContainerRef {
        name: container.name.clone(),
        image: container.image.clone().unwrap_or_default(),
        is_init,
        status: status_text(statuses.get(&container.name)),
        volume_mounts: container.volume_mounts.clone().unwrap_or_default(),
    }
}

/// Assemble volumes, containers, then root folder + favorites per container
///
/// Init containers get no filesystem or favorites roots.
pub fn build_pod_nodes(
    pod: &PodContext,
    description: &Pod,
    init_statuses: &HashMap<String, ContainerStatus>,
    statuses: &HashMap<String, ContainerStatus>,
) -> Vec<Node> {
    let Some(spec) = description.spec.as_ref() else {
        return Vec::new();
    };

    let volumes = spec
        .volumes
        .iter()
        .flatten()
        .map(|volume| {
            Node::Volume(VolumeNode {
                pod: pod.clone(),
                volume: volume.clone(),
            })
        });

    let init_containers = spec
        .init_containers
        .iter()
        .flatten()
        .map(|container| container_ref(container, true, init_statuses));
    let containers = spec
        .containers
        .iter()
        .map(|container| container_ref(container, false, statuses));
    let container_nodes = init_containers.chain(containers).map(|container| {
        Node::Container(ContainerNode {
            pod: pod.clone(),
            container,
        })
    });

    let filesystems = spec.containers.iter().flat_map(|container| {
        let target = pod.container(&container.name);
        let mount_paths: Arc<[String]> = container
            .volume_mounts
            .iter()
            .flatten()
            .map(|mount| mount.mount_path.clone())
            .collect();
        [
            Node::Folder(FsEntry::root(target.clone(), mount_paths.clone())),
            Node::Favorites(FavoritesGroup {
                target,
                mount_paths,
            }),
        ]
    });

    volumes.chain(container_nodes).chain(filesystems).collect()
}

/// Children of a container node: its status, then one node per mount
pub fn container_children(node: &ContainerNode) -> Vec<Node> {
    let target = node.target();
    std::iter::once(Node::ContainerStatus(StatusNode {
        target: target.clone(),
        status: node.container.status.clone(),
    }))
    .chain(node.container.volume_mounts.iter().map(|mount| {
        Node::VolumeMount(VolumeMountNode {
            target: target.clone(),
            mount: mount.clone(),
        })
    }))
    .collect()
}
