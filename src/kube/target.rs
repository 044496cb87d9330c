//! Identifiers for the remote resources commands are aimed at

use std::fmt;

/// Pod a tree branch was built for; fixed once the branch exists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PodContext {
    pub pod_name: String,
    pub namespace: String,
}

impl PodContext {
    pub fn new(pod_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            pod_name: pod_name.into(),
            namespace: namespace.into(),
        }
    }

    /// Narrow to one container of this pod
    pub fn container(&self, container: impl Into<String>) -> ContainerTarget {
        ContainerTarget {
            pod: self.clone(),
            container: container.into(),
        }
    }
}

impl fmt::Display for PodContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.pod_name)
    }
}

/// A single container inside a pod
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerTarget {
    pub pod: PodContext,
    pub container: String,
}

impl ContainerTarget {
    pub fn new(
        pod_name: impl Into<String>,
        namespace: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        PodContext::new(pod_name, namespace).container(container)
    }

    pub fn pod_name(&self) -> &str {
        &self.pod.pod_name
    }

    pub fn namespace(&self) -> &str {
        &self.pod.namespace
    }
}

impl fmt::Display for ContainerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pod, self.container)
    }
}
