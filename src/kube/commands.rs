//! kubectl command-line builders
//!
//! Every string produced here is handed to a [`CommandExecutor`](super::CommandExecutor)
//! as-is, so arguments that come from remote listings or user input are
//! shell-quoted.

use super::target::{ContainerTarget, PodContext};
use shell_words::quote;

/// Full pod description
pub fn get_pod_json(pod: &PodContext) -> String {
    format!(
        "get pods {} --namespace {} -o json",
        quote(&pod.pod_name),
        quote(&pod.namespace)
    )
}

/// A jsonpath projection of the pod, e.g. `.status.containerStatuses`
pub fn get_pod_jsonpath(pod: &PodContext, field: &str) -> String {
    format!(
        "get pods {} --namespace {} -o {}",
        quote(&pod.pod_name),
        quote(&pod.namespace),
        quote(&format!("jsonpath={{{field}}}"))
    )
}

/// Non-interactive exec of `command` inside the target container
pub fn exec(target: &ContainerTarget, command: &[&str]) -> String {
    let container = if target.container.is_empty() {
        String::new()
    } else {
        format!(" -c {}", quote(&target.container))
    };
    let command = command
        .iter()
        .map(|part| quote(part).into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "exec {}{} --namespace {} -- {}",
        quote(target.pod_name()),
        container,
        quote(target.namespace()),
        command
    )
}

/// `ls -F` of a remote directory; entries carry type markers (`/`, `@`, `*`)
pub fn list_folder(target: &ContainerTarget, path: &str) -> String {
    exec(target, &["ls", "-F", path])
}

/// Copy a remote file or folder to a local path
pub fn copy_from_remote(target: &ContainerTarget, remote_path: &str, local_path: &str) -> String {
    format!(
        "cp {} {} -c {}",
        quote(&remote_spec(target, remote_path)),
        quote(local_path),
        quote(&target.container)
    )
}

/// Copy a local file or folder to a remote path
pub fn copy_to_remote(target: &ContainerTarget, local_path: &str, remote_path: &str) -> String {
    format!(
        "cp {} {} -c {}",
        quote(local_path),
        quote(&remote_spec(target, remote_path)),
        quote(&target.container)
    )
}

/// Interactive shell in the container, optionally starting in `workdir`
pub fn shell(target: &ContainerTarget, workdir: Option<&str>) -> String {
    let base = format!(
        "exec -it {} -c {} --namespace {} -- sh",
        quote(target.pod_name()),
        quote(&target.container),
        quote(target.namespace())
    );
    match workdir {
        Some(dir) => format!(
            "{base} -c {}",
            quote(&format!("cd {} && exec sh", quote(dir)))
        ),
        None => base,
    }
}

/// Follow a remote file
pub fn tail_follow(target: &ContainerTarget, path: &str) -> String {
    format!(
        "exec -it --namespace {} -c {} {} -- tail -f {}",
        quote(target.namespace()),
        quote(&target.container),
        quote(target.pod_name()),
        quote(path)
    )
}

/// Node description, used to resolve the node's hostname label
pub fn get_node_json(node: &str) -> String {
    format!("get nodes {} -o json", quote(node))
}

/// Privileged nsenter pod pinned to a node's host namespaces
pub fn nsenter(node: &str, hostname: &str, image: &str) -> String {
    let overrides = serde_json::json!({
        "spec": {
            "hostPID": true,
            "hostNetwork": true,
            "nodeSelector": { "kubernetes.io/hostname": hostname },
            "tolerations": [{ "operator": "Exists" }],
            "containers": [{
                "name": "nsenter",
                "image": image,
                "command": ["/nsenter", "--all", "--target=1", "--", "su", "-"],
                "stdin": true,
                "tty": true,
                "securityContext": { "privileged": true }
            }]
        }
    });
    format!(
        "run {} --restart=Never -it --rm --image=overriden --overrides={} --attach {}",
        quote(&format!("nsenter-{node}")),
        quote(&overrides.to_string()),
        quote(node)
    )
}

fn remote_spec(target: &ContainerTarget, remote_path: &str) -> String {
    format!("{}/{}:{}", target.namespace(), target.pod_name(), remote_path)
}
