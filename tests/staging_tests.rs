//! Staging tests: copy out for editing, copy back on save

mod common;

use common::{MockExecutor, notifier, target};
use podfs::kube::CommandOutput;
use podfs::notify::Severity;
use podfs::staging::{RemoteFile, STAGING_DIR, SaveOutcome, StagingArea};
use std::sync::{Arc, Mutex};

/// Executor that records every command line and creates the local copy for
/// `cp` out of the pod, the way kubectl would
fn copying_executor(seen: Arc<Mutex<Vec<String>>>) -> MockExecutor {
    let mut executor = MockExecutor::new();
    executor.expect_invoke().returning(move |line| {
        seen.lock().unwrap().push(line.to_string());
        let words = shell_words::split(line).unwrap();
        if words[0] == "cp" && words[1].contains(':') {
            std::fs::write(&words[2], "key: value\n").unwrap();
        }
        Ok(CommandOutput::success(""))
    });
    executor
}

#[tokio::test]
async fn test_stage_layout_and_command() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(copying_executor(seen.clone())),
        notifier(),
    );

    let remote = RemoteFile::new(target(), "/etc/app/config.yaml");
    let local = area.stage(&remote).await.unwrap();

    assert!(local.starts_with(dir.path().join(STAGING_DIR)));
    assert_eq!(local.file_name().unwrap(), "config.yaml");
    assert!(local.is_file());

    let commands = seen.lock().unwrap().clone();
    assert_eq!(
        commands,
        vec![format!(
            "cp shop/web-0:/etc/app/config.yaml {} -c app",
            local.display()
        )]
    );
}

#[tokio::test]
async fn test_same_file_reuses_location() {
    let dir = tempfile::tempdir().unwrap();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(copying_executor(Arc::default())),
        notifier(),
    );

    let remote = RemoteFile::new(target(), "/etc/app/config.yaml");
    let first = area.stage(&remote).await.unwrap();
    let second = area.stage(&remote).await.unwrap();
    assert_eq!(first, second);

    let other_container = RemoteFile::new(
        podfs::kube::ContainerTarget::new("web-0", "shop", "sidecar"),
        "/etc/app/config.yaml",
    );
    assert_ne!(area.stage(&other_container).await.unwrap(), first);
}

#[tokio::test]
async fn test_concurrent_stages_share_location() {
    let dir = tempfile::tempdir().unwrap();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(copying_executor(Arc::default())),
        notifier(),
    );

    let remote = RemoteFile::new(target(), "/etc/app/config.yaml");
    let (first, second) = tokio::join!(area.stage(&remote), area.stage(&remote));
    let first = first.unwrap();
    assert_eq!(Some(first.clone()), second);
    assert_eq!(area.lookup(&first), Some(remote.clone()));
    assert_eq!(area.local_path(&remote), Some(first));
}

#[tokio::test]
async fn test_failed_stage_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let mut executor = MockExecutor::new();
    executor
        .expect_invoke()
        .returning(|_| Ok(CommandOutput::failure(1, "container not found")));
    let notifier = notifier();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(executor),
        notifier.clone(),
    );

    let remote = RemoteFile::new(target(), "/etc/app/config.yaml");
    assert_eq!(area.stage(&remote).await, None);
    assert_eq!(area.local_path(&remote), None);

    let staging = dir.path().join(STAGING_DIR);
    let leftovers: Vec<_> = std::fs::read_dir(&staging)
        .map(|entries| entries.flatten().map(|entry| entry.path()).collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty(), "left behind: {leftovers:?}");

    let errors = notifier.with_severity(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("container not found"));
}

#[tokio::test]
async fn test_failed_restage_keeps_earlier_copy() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(Mutex::new(0));
    let mut executor = MockExecutor::new();
    let counter = calls.clone();
    executor.expect_invoke().returning(move |line| {
        let mut count = counter.lock().unwrap();
        *count += 1;
        if *count > 1 {
            return Ok(CommandOutput::failure(1, "connection refused"));
        }
        let words = shell_words::split(line).unwrap();
        std::fs::write(&words[2], "x").unwrap();
        Ok(CommandOutput::success(""))
    });
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(executor),
        notifier(),
    );

    let remote = RemoteFile::new(target(), "/etc/hosts");
    let local = area.stage(&remote).await.unwrap();
    assert_eq!(area.stage(&remote).await, None);

    assert!(local.is_file());
    assert_eq!(area.lookup(&local), Some(remote));
}

#[tokio::test]
async fn test_save_copies_back() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let notifier = notifier();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(copying_executor(seen.clone())),
        notifier.clone(),
    );

    let remote = RemoteFile::new(target(), "/etc/app/config.yaml");
    let local = area.stage(&remote).await.unwrap();
    assert_eq!(area.on_saved(&local).await, SaveOutcome::Uploaded(remote));

    let commands = seen.lock().unwrap().clone();
    assert_eq!(
        commands[1],
        format!(
            "cp {} shop/web-0:/etc/app/config.yaml -c app",
            local.display()
        )
    );
    let info = notifier.with_severity(Severity::Info);
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].message, "Saved file config.yaml to pod web-0");
}

#[tokio::test]
async fn test_unrelated_save_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(MockExecutor::new()),
        notifier(),
    );

    let elsewhere = dir.path().join("notes.txt");
    assert_eq!(area.on_saved(&elsewhere).await, SaveOutcome::NotStaged);
}

#[tokio::test]
async fn test_failed_copy_back_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut executor = MockExecutor::new();
    executor
        .expect_invoke()
        .withf(|line| line.starts_with("cp shop/"))
        .returning(|line| {
            let words = shell_words::split(line).unwrap();
            std::fs::write(&words[2], "x").unwrap();
            Ok(CommandOutput::success(""))
        });
    executor
        .expect_invoke()
        .withf(|line| !line.starts_with("cp shop/"))
        .returning(|_| Ok(CommandOutput::failure(1, "read-only file system")));
    let notifier = notifier();
    let area = StagingArea::new(
        Some(dir.path().to_path_buf()),
        Arc::new(executor),
        notifier.clone(),
    );

    let remote = RemoteFile::new(target(), "/etc/hosts");
    let local = area.stage(&remote).await.unwrap();
    assert_eq!(area.on_saved(&local).await, SaveOutcome::Failed(remote));
    let errors = notifier.with_severity(Severity::Error);
    assert!(errors[0].message.contains("read-only file system"));
}

#[tokio::test]
async fn test_missing_root_is_an_error() {
    let notifier = notifier();
    let area = StagingArea::new(None, Arc::new(MockExecutor::new()), notifier.clone());

    assert_eq!(
        area.stage(&RemoteFile::new(target(), "/etc/hosts")).await,
        None
    );
    assert_eq!(notifier.with_severity(Severity::Error).len(), 1);
}
