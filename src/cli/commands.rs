//! Explorer subcommand handlers
//!
//! Each handler builds the node it needs (usually by discovering the pod
//! first) and goes through the same [`Explorer`] operations a tree host
//! would call.

use super::console::ConsoleNotifier;
use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use podfs::config::ConfigLoader;
use podfs::content::{DocumentMode, DocumentUri};
use podfs::favorites::{
    AddOutcome, FavoriteKind, FavoriteScope, FavoritesStore, ScopeKey, YamlStateStore,
};
use podfs::kube::{self, ContainerTarget, KubectlExecutor, PodContext};
use podfs::session::{self, Explorer};
use podfs::staging::SaveOutcome;
use podfs::tree::{Collapsible, FavoritesGroup, FsEntry, Node};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Favorite scope as chosen on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// Namespace and pod
    Explicit,
    /// Pod name in any namespace
    Pod,
    /// Every pod
    Global,
}

impl From<ScopeArg> for FavoriteScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Explicit => FavoriteScope::Explicit,
            ScopeArg::Pod => FavoriteScope::Pod,
            ScopeArg::Global => FavoriteScope::Global,
        }
    }
}

/// Favorites management subcommands
#[derive(Subcommand, Debug)]
pub enum FavSubcommand {
    /// Bookmark a file or folder
    Add {
        pod: String,
        path: String,
        #[arg(short, long)]
        container: Option<String>,
        /// The path is a folder
        #[arg(long)]
        folder: bool,
        #[arg(long, value_enum, default_value = "explicit")]
        scope: ScopeArg,
    },
    /// Remove a bookmark from one scope
    Remove {
        pod: String,
        path: String,
        #[arg(short, long)]
        container: Option<String>,
        #[arg(long)]
        folder: bool,
        #[arg(long, value_enum, default_value = "explicit")]
        scope: ScopeArg,
    },
    /// Show the stored bookmarks of every scope that applies to a pod
    List { pod: String },
}

/// Everything a subcommand needs: the explorer plus the cluster defaults
pub struct Session {
    pub explorer: Explorer,
    pub executor: Arc<KubectlExecutor>,
    pub namespace: String,
}

impl Session {
    pub fn new(
        namespace: Option<&str>,
        context: Option<String>,
        kubeconfig: Option<PathBuf>,
    ) -> Result<Self> {
        let config = ConfigLoader::load().context("Failed to load configuration")?;
        let kubeconfig = kubeconfig.or_else(|| config.kubeconfig.clone());
        let context = context.or_else(|| config.context.clone());
        let namespace = kube::resolve_namespace(
            namespace,
            config.default_namespace.as_deref(),
            kubeconfig.as_deref(),
            context.as_deref(),
        );
        tracing::debug!(
            "Using namespace {} (context: {:?})",
            namespace,
            kube::get_context(kubeconfig.as_deref(), context.as_deref())
        );

        let executor = Arc::new(
            KubectlExecutor::new(&config.kubectl)
                .with_kubeconfig(kubeconfig)
                .with_context(context),
        );
        let store = FavoritesStore::new(Arc::new(YamlStateStore::new(
            ConfigLoader::favorites_path(&config),
        )));
        let explorer = Explorer::new(
            executor.clone(),
            Arc::new(ConsoleNotifier),
            store,
            config.staging_root.clone(),
        )
        .with_nsenter_image(config.nsenter_image.clone());

        Ok(Self {
            explorer,
            executor,
            namespace,
        })
    }

    pub fn pod(&self, name: &str) -> PodContext {
        PodContext::new(name, &self.namespace)
    }

    /// Favorites group of a container, found through pod discovery
    ///
    /// Without `-c` the first regular container is used.
    pub async fn container(&self, pod: &str, container: Option<&str>) -> Result<FavoritesGroup> {
        let pod = self.pod(pod);
        self.explorer
            .root_children(&pod)
            .await
            .into_iter()
            .find_map(|node| match node {
                Node::Favorites(group)
                    if container.is_none_or(|name| group.target.container == name) =>
                {
                    Some(group)
                }
                _ => None,
            })
            .with_context(|| match container {
                Some(name) => format!("Container {name} not found in pod {pod}"),
                None => format!("No container found in pod {pod}"),
            })
    }

    /// A file or folder node inside a container
    pub async fn entry(
        &self,
        pod: &str,
        container: Option<&str>,
        path: &str,
        folder: bool,
    ) -> Result<Node> {
        let group = self.container(pod, container).await?;
        Ok(node_for_path(group.target, group.mount_paths, path, folder))
    }

    /// Print the pod tree down to `depth` levels
    pub async fn tree(&self, pod: &str, depth: usize) -> Result<()> {
        let roots = self.explorer.root_children(&self.pod(pod)).await;
        if roots.is_empty() {
            anyhow::bail!("Nothing to show for pod {pod}");
        }
        for line in expand(&self.explorer, roots, depth).await {
            println!("{line}");
        }
        Ok(())
    }

    pub async fn ls(&self, pod: &str, container: Option<&str>, path: &str) -> Result<()> {
        let folder = self.entry(pod, container, path, true).await?;
        for child in self.explorer.children(&folder).await {
            let item = child.tree_item();
            let marker = if child.is_file() { "" } else { "/" };
            println!("{}{marker}", item.label);
        }
        Ok(())
    }

    /// Print a virtual document: `cat`, `find` or `ls -al`
    pub async fn document(
        &self,
        pod: &str,
        container: Option<&str>,
        path: &str,
        mode: DocumentMode,
    ) -> Result<()> {
        let node = self
            .entry(pod, container, path, mode != DocumentMode::View)
            .await?;
        let uri = session::document_for(&node, mode)
            .with_context(|| format!("{} does not apply to {path}", mode.command_label()))?;
        tracing::debug!("Opening {}", uri);
        print!("{}", self.explorer.provide(&uri).await);
        Ok(())
    }

    /// Print a document from its identifier
    pub async fn open(&self, uri: &str) -> Result<()> {
        let uri: DocumentUri = uri.parse()?;
        print!("{}", self.explorer.provide(&uri).await);
        Ok(())
    }

    pub async fn favorites(&self, pod: &str, container: Option<&str>) -> Result<()> {
        let group = self.container(pod, container).await?;
        for node in self.explorer.children(&Node::Favorites(group)).await {
            let item = node.tree_item();
            let entry = node.fs_entry();
            let path = entry.map(FsEntry::full_path).unwrap_or_default();
            let scope = entry
                .and_then(|entry| entry.favorite_key.as_ref())
                .map(ScopeKey::to_string)
                .unwrap_or_default();
            println!("{}\t{path}\t{scope}", item.tag.as_str());
        }
        Ok(())
    }

    /// Stage a file, open it in `$EDITOR`, and copy it back when it changed
    pub async fn edit(&self, pod: &str, container: Option<&str>, path: &str) -> Result<()> {
        let node = self.entry(pod, container, path, false).await?;
        let Some(local) = self.explorer.open_for_edit(&node).await else {
            anyhow::bail!("Can't stage {path} for editing");
        };

        let before = modified(&local);
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        let mut words = shell_words::split(&editor)
            .with_context(|| format!("Failed to parse EDITOR: {editor}"))?;
        if words.is_empty() {
            anyhow::bail!("EDITOR is empty");
        }
        let program = words.remove(0);
        let status = tokio::process::Command::new(&program)
            .args(&words)
            .arg(&local)
            .status()
            .await
            .with_context(|| format!("Failed to run {program}"))?;
        if !status.success() {
            anyhow::bail!("{program} exited with {status}; {path} was not copied back");
        }

        if modified(&local) == before {
            eprintln!("No changes to {path}");
            return Ok(());
        }
        match self.explorer.on_saved(&local).await {
            SaveOutcome::Uploaded(_) => Ok(()),
            SaveOutcome::Failed(remote) => anyhow::bail!("Can't copy {} back", remote.path),
            SaveOutcome::NotStaged => {
                anyhow::bail!("{} is not a staged file", local.display())
            }
        }
    }

    pub async fn copy_from(
        &self,
        pod: &str,
        container: Option<&str>,
        path: &str,
        folder: bool,
        local_dir: &Path,
    ) -> Result<()> {
        let node = self.entry(pod, container, path, folder).await?;
        let local = self
            .explorer
            .copy_from(&node, local_dir)
            .await
            .with_context(|| format!("Can't copy {path}"))?;
        println!("{}", local.display());
        Ok(())
    }

    pub async fn copy_to(
        &self,
        pod: &str,
        container: Option<&str>,
        folder: &str,
        local_file: &Path,
    ) -> Result<()> {
        let node = self.entry(pod, container, folder, true).await?;
        let remote = self
            .explorer
            .copy_to(&node, local_file)
            .await
            .with_context(|| format!("Can't copy {}", local_file.display()))?;
        println!("{remote}");
        Ok(())
    }

    pub async fn shell(&self, pod: &str, container: Option<&str>, path: Option<&str>) -> Result<()> {
        let group = self.container(pod, container).await?;
        let command_line = match path {
            Some(path) => session::shell_command(&node_for_path(
                group.target,
                group.mount_paths,
                path,
                true,
            )),
            None => Some(kube::commands::shell(&group.target, None)),
        }
        .context("No shell for this node")?;
        self.attach(&command_line).await
    }

    pub async fn tail(&self, pod: &str, container: Option<&str>, path: &str) -> Result<()> {
        let node = self.entry(pod, container, path, false).await?;
        let command_line = session::tail_command(&node).context("Only files can be tailed")?;
        self.attach(&command_line).await
    }

    pub async fn node_shell(&self, node: &str) -> Result<()> {
        let command_line = self
            .explorer
            .node_shell_command(node)
            .await
            .with_context(|| format!("Can't open a shell on node {node}"))?;
        self.attach(&command_line).await
    }

    async fn attach(&self, command_line: &str) -> Result<()> {
        let code = self.executor.attach(command_line).await?;
        if code != 0 {
            anyhow::bail!("kubectl exited with {code}");
        }
        Ok(())
    }
}

/// Handle favorites subcommands
pub async fn handle_fav_command(session: &Session, cmd: FavSubcommand) -> Result<()> {
    match cmd {
        FavSubcommand::Add {
            pod,
            path,
            container,
            folder,
            scope,
        } => {
            let node = session.entry(&pod, container.as_deref(), &path, folder).await?;
            match session.explorer.add_favorite(&node, scope.into()) {
                Some(AddOutcome::Added | AddOutcome::Duplicate) => Ok(()),
                None => anyhow::bail!("Can't add {path} to favorites"),
            }
        }
        FavSubcommand::Remove {
            pod,
            path,
            container,
            folder,
            scope,
        } => {
            let group = session.container(&pod, container.as_deref()).await?;
            let key = ScopeKey::for_scope(scope.into(), &group.target.pod);
            let node = match node_for_path(group.target, group.mount_paths, &path, folder) {
                Node::File(entry) => Node::File(entry.with_favorite_key(key)),
                Node::Folder(entry) => Node::Folder(entry.with_favorite_key(key)),
                other => other,
            };
            if session.explorer.remove_favorite(&node) == 0 {
                eprintln!("{path} was not a favorite");
            }
            Ok(())
        }
        FavSubcommand::List { pod } => {
            let pod = session.pod(&pod);
            for (scope, key) in FavoriteScope::ALL.into_iter().zip(ScopeKey::all_for(&pod)) {
                for entry in session.explorer.favorites().list(&key)? {
                    let kind = match entry.kind {
                        FavoriteKind::File => "file",
                        FavoriteKind::Folder => "folder",
                    };
                    println!("{}\t{kind}\t{}", scope.title(), entry.path);
                }
            }
            Ok(())
        }
    }
}

/// File or folder node for an absolute path
fn node_for_path(
    target: ContainerTarget,
    mount_paths: Arc<[String]>,
    path: &str,
    folder: bool,
) -> Node {
    let trimmed = path.trim_end_matches('/');
    let (prefix, name) = match trimmed.rsplit_once('/') {
        Some((prefix, name)) => (format!("{prefix}/"), name),
        None => ("/".to_string(), trimmed),
    };
    let entry = FsEntry::new(target, prefix, name, mount_paths);
    if folder {
        Node::Folder(entry)
    } else {
        Node::File(entry)
    }
}

fn modified(path: &Path) -> Option<std::time::SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Render nodes as indented lines, expanding collapsible nodes
///
/// Siblings are expanded concurrently.
fn expand(explorer: &Explorer, nodes: Vec<Node>, depth: usize) -> LocalBoxFuture<'_, Vec<String>> {
    async move {
        let rendered = join_all(nodes.into_iter().map(|node| async move {
            let item = node.tree_item();
            let mut lines = vec![item.label];
            if depth > 0 && item.collapsible == Collapsible::Collapsed {
                let children = explorer.children(&node).await;
                lines.extend(
                    expand(explorer, children, depth - 1)
                        .await
                        .into_iter()
                        .map(|line| format!("  {line}")),
                );
            }
            lines
        }))
        .await;
        rendered.into_iter().flatten().collect()
    }
    .boxed_local()
}
