//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use podfs::kube::{CommandExecutor, CommandOutput, ContainerTarget, PodContext};
use podfs::notify::RecordingNotifier;
use std::sync::Arc;

mockall::mock! {
    pub Executor {}

    #[async_trait]
    impl CommandExecutor for Executor {
        async fn invoke(&self, command_line: &str) -> anyhow::Result<CommandOutput>;
    }
}

pub const POD_JSON: &str = r#"{
    "apiVersion": "v1",
    "kind": "Pod",
    "metadata": { "name": "web-0", "namespace": "shop" },
    "spec": {
        "volumes": [
            { "name": "data", "emptyDir": {} },
            { "name": "config", "configMap": { "name": "web-config" } }
        ],
        "initContainers": [{ "name": "migrate", "image": "migrator:1" }],
        "containers": [
            {
                "name": "app",
                "image": "shop:2",
                "volumeMounts": [
                    { "name": "data", "mountPath": "/data" },
                    { "name": "config", "mountPath": "/etc/app" }
                ]
            },
            { "name": "sidecar", "image": "envoy:1" }
        ]
    }
}"#;

pub const CONTAINER_STATUSES: &str = r#"'[{
    "name": "app",
    "image": "shop:2",
    "imageID": "",
    "ready": true,
    "restartCount": 0,
    "state": { "running": { "startedAt": "2024-05-01T10:00:00Z" } }
}]'"#;

pub const INIT_CONTAINER_STATUSES: &str = r#"'[{
    "name": "migrate",
    "image": "migrator:1",
    "imageID": "",
    "ready": false,
    "restartCount": 0,
    "state": { "terminated": { "exitCode": 0, "reason": "Completed" } }
}]'"#;

pub fn pod() -> PodContext {
    PodContext::new("web-0", "shop")
}

pub fn target() -> ContainerTarget {
    ContainerTarget::new("web-0", "shop", "app")
}

pub fn notifier() -> Arc<RecordingNotifier> {
    Arc::new(RecordingNotifier::new())
}

/// Executor answering the three discovery queries for [`POD_JSON`]
pub fn discovery_executor() -> MockExecutor {
    let mut executor = MockExecutor::new();
    expect_discovery(&mut executor);
    executor
}

pub fn expect_discovery(executor: &mut MockExecutor) {
    executor
        .expect_invoke()
        .withf(|line| line.starts_with("get pods") && line.ends_with("-o json"))
        .returning(|_| Ok(CommandOutput::success(POD_JSON)));
    executor
        .expect_invoke()
        .withf(|line| line.contains("initContainerStatuses"))
        .returning(|_| Ok(CommandOutput::success(INIT_CONTAINER_STATUSES)));
    executor
        .expect_invoke()
        .withf(|line| line.contains("{.status.containerStatuses}"))
        .returning(|_| Ok(CommandOutput::success(CONTAINER_STATUSES)));
}
