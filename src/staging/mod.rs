//! Local file staging
//!
//! Editing a remote file copies it to `<root>/.kubectl.tmp/<uuid>/<filename>`.
//! The uuid is bound to the remote (namespace, pod, container, path) for the
//! lifetime of the session, so staging the same file twice lands in the same
//! place and a save of the local copy can be mapped back to its origin.

use crate::kube::{CommandExecutor, ContainerTarget, commands};
use crate::notify::{Notice, Notifier};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Directory created under the staging root
pub const STAGING_DIR: &str = ".kubectl.tmp";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StagingError {
    #[error(
        "No workspace root path found. Please configure a staging root to determine a temporary storage location"
    )]
    NoStagingRoot,

    #[error("Remote path has no file name: {0}")]
    NoFileName(String),

    #[error("Staging registry is unavailable")]
    RegistryUnavailable,
}

/// A file inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteFile {
    pub target: ContainerTarget,
    pub path: String,
}

impl RemoteFile {
    pub fn new(target: ContainerTarget, path: impl Into<String>) -> Self {
        Self {
            target,
            path: path.into(),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

/// What happened when a local file was saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file is not a staged copy; nothing to do
    NotStaged,
    Uploaded(RemoteFile),
    Failed(RemoteFile),
}

/// Both directions of the remote file to staging id mapping
#[derive(Debug, Default)]
struct Registry {
    ids: HashMap<RemoteFile, Uuid>,
    origins: HashMap<Uuid, RemoteFile>,
}

/// Id handed out for one `stage` call
struct Reservation {
    id: Uuid,
    local: PathBuf,
    /// This call created the id and owns rolling it back
    fresh: bool,
}

pub struct StagingArea {
    root: Option<PathBuf>,
    staged: Mutex<Registry>,
    executor: Arc<dyn CommandExecutor>,
    notifier: Arc<dyn Notifier>,
}

impl StagingArea {
    pub fn new(
        root: Option<PathBuf>,
        executor: Arc<dyn CommandExecutor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            root,
            staged: Mutex::new(Registry::default()),
            executor,
            notifier,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn path_for(root: &Path, id: Uuid, file_name: &str) -> PathBuf {
        root.join(STAGING_DIR).join(id.to_string()).join(file_name)
    }

    /// Find or create the id for `remote` in one step under the lock, so
    /// overlapping `stage` calls for the same file agree on one location
    fn reserve(&self, remote: &RemoteFile) -> Result<Reservation, StagingError> {
        let root = self.root.as_ref().ok_or(StagingError::NoStagingRoot)?;
        let file_name = remote
            .file_name()
            .ok_or_else(|| StagingError::NoFileName(remote.path.clone()))?;
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| StagingError::RegistryUnavailable)?;

        let (id, fresh) = match staged.ids.get(remote) {
            Some(id) => (*id, false),
            None => {
                let id = Uuid::new_v4();
                staged.ids.insert(remote.clone(), id);
                staged.origins.insert(id, remote.clone());
                (id, true)
            }
        };
        Ok(Reservation {
            id,
            local: Self::path_for(root, id, file_name),
            fresh,
        })
    }

    /// Undo a fresh reservation whose copy never landed
    async fn release(&self, reservation: &Reservation) {
        if !reservation.fresh {
            return;
        }
        if let Ok(mut staged) = self.staged.lock()
            && let Some(remote) = staged.origins.remove(&reservation.id)
        {
            staged.ids.remove(&remote);
        }
        if let Some(dir) = reservation.local.parent()
            && let Err(e) = tokio::fs::remove_dir_all(dir).await
        {
            tracing::debug!("Can't remove {}: {}", dir.display(), e);
        }
    }

    /// Local path of a file that was already staged
    pub fn local_path(&self, remote: &RemoteFile) -> Option<PathBuf> {
        let root = self.root.as_ref()?;
        let id = *self.staged.lock().ok()?.ids.get(remote)?;
        Some(Self::path_for(root, id, remote.file_name()?))
    }

    /// Copy a remote file into the staging area
    ///
    /// Returns the local path, or `None` after notifying the operator when
    /// there is no staging root or the copy failed.
    pub async fn stage(&self, remote: &RemoteFile) -> Option<PathBuf> {
        let reservation = match self.reserve(remote) {
            Ok(reservation) => reservation,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return None;
            }
        };
        let local = reservation.local.clone();

        if let Some(parent) = local.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            self.notifier.notify(Notice::error(format!(
                "Can't create staging directory {}: {e}",
                parent.display()
            )));
            self.release(&reservation).await;
            return None;
        }

        let local_str = local.to_string_lossy();
        let command_line = commands::copy_from_remote(&remote.target, &remote.path, &local_str);
        tracing::debug!("Staging {} as {}", remote.path, local.display());
        let failure = match self.executor.invoke(&command_line).await {
            Ok(output) if output.is_success() => None,
            Ok(output) => Some(output.stderr.trim().to_string()),
            Err(e) => Some(format!("{e:#}")),
        };
        if let Some(stderr) = failure {
            self.notifier
                .notify(Notice::error(format!("kubectl {command_line} failed: {stderr}")));
            self.release(&reservation).await;
            return None;
        }

        Some(local)
    }

    /// Remote origin of a staged local file
    pub fn lookup(&self, local: &Path) -> Option<RemoteFile> {
        let id = local
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .and_then(|name| Uuid::parse_str(name).ok())?;
        let staged = self.staged.lock().ok()?;
        staged.origins.get(&id).cloned()
    }

    /// Copy a saved local file back to where it was staged from
    pub async fn on_saved(&self, local: &Path) -> SaveOutcome {
        let Some(remote) = self.lookup(local) else {
            return SaveOutcome::NotStaged;
        };

        let local_str = local.to_string_lossy();
        let command_line = commands::copy_to_remote(&remote.target, &local_str, &remote.path);
        let failure = match self.executor.invoke(&command_line).await {
            Ok(output) if output.is_success() => None,
            Ok(output) => Some(output.stderr.trim().to_string()),
            Err(e) => Some(format!("{e:#}")),
        };

        match failure {
            None => {
                let name = remote.file_name().unwrap_or(&remote.path);
                self.notifier.notify(Notice::info(format!(
                    "Saved file {name} to pod {}",
                    remote.target.pod_name()
                )));
                SaveOutcome::Uploaded(remote)
            }
            Some(stderr) => {
                self.notifier
                    .notify(Notice::error(format!("kubectl {command_line} failed: {stderr}")));
                SaveOutcome::Failed(remote)
            }
        }
    }
}
