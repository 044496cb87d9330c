//! podfs - browse files inside running pod containers from the terminal

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigSubcommand, FavSubcommand, Session};
use podfs::content::DocumentMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "podfs")]
#[command(about = "Browse, view, edit and bookmark files inside running pod containers", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Namespace (defaults to config, then the kubeconfig context)
    #[arg(long, short = 'n', global = true)]
    namespace: Option<String>,

    /// Kubeconfig context
    #[arg(long, global = true)]
    context: Option<String>,

    /// Kubeconfig file
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tree of a pod
    Tree {
        pod: String,
        /// Levels to expand below the pod
        #[arg(long, default_value_t = 2)]
        depth: usize,
    },
    /// List a folder
    Ls {
        pod: String,
        #[arg(default_value = "/")]
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Print a file
    Cat {
        pod: String,
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Run find on a folder
    Find {
        pod: String,
        #[arg(default_value = "/")]
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Run ls -al on a folder
    #[command(name = "ls-al")]
    LsAl {
        pod: String,
        #[arg(default_value = "/")]
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Print a document from its identifier (e.g. kubernetes-file-view:pod:ns:container:/path)
    Open { uri: String },
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        subcommand: FavSubcommand,
    },
    /// Show the favorites group of a container
    Favorites {
        pod: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Edit a file in $EDITOR and copy it back on save
    Edit {
        pod: String,
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Copy a file or folder out of a container
    CpFrom {
        pod: String,
        path: String,
        /// Local directory to copy into
        #[arg(default_value = ".")]
        local_dir: PathBuf,
        #[arg(short, long)]
        container: Option<String>,
        /// The path is a folder
        #[arg(long)]
        folder: bool,
    },
    /// Copy a local file into a container folder
    CpTo {
        pod: String,
        /// Remote folder
        folder: String,
        local_file: PathBuf,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Open a shell in a container
    Shell {
        pod: String,
        /// Working directory
        path: Option<String>,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Follow a file
    Tail {
        pod: String,
        path: String,
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Open a privileged shell on a cluster node
    NodeShell { node: String },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let command = match args.command {
        Command::Config { subcommand } => return cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            return Ok(());
        }
        command => command,
    };

    if let Some(log_path) = cli::init_logging(args.debug) {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let session = Session::new(args.namespace.as_deref(), args.context, args.kubeconfig)?;

    match command {
        Command::Tree { pod, depth } => session.tree(&pod, depth).await,
        Command::Ls {
            pod,
            path,
            container,
        } => session.ls(&pod, container.as_deref(), &path).await,
        Command::Cat {
            pod,
            path,
            container,
        } => {
            session
                .document(&pod, container.as_deref(), &path, DocumentMode::View)
                .await
        }
        Command::Find {
            pod,
            path,
            container,
        } => {
            session
                .document(&pod, container.as_deref(), &path, DocumentMode::Find)
                .await
        }
        Command::LsAl {
            pod,
            path,
            container,
        } => {
            session
                .document(&pod, container.as_deref(), &path, DocumentMode::ListAll)
                .await
        }
        Command::Open { uri } => session.open(&uri).await,
        Command::Fav { subcommand } => cli::handle_fav_command(&session, subcommand).await,
        Command::Favorites { pod, container } => {
            session.favorites(&pod, container.as_deref()).await
        }
        Command::Edit {
            pod,
            path,
            container,
        } => session.edit(&pod, container.as_deref(), &path).await,
        Command::CpFrom {
            pod,
            path,
            local_dir,
            container,
            folder,
        } => {
            session
                .copy_from(&pod, container.as_deref(), &path, folder, &local_dir)
                .await
        }
        Command::CpTo {
            pod,
            folder,
            local_file,
            container,
        } => {
            session
                .copy_to(&pod, container.as_deref(), &folder, &local_file)
                .await
        }
        Command::Shell {
            pod,
            path,
            container,
        } => {
            session
                .shell(&pod, container.as_deref(), path.as_deref())
                .await
        }
        Command::Tail {
            pod,
            path,
            container,
        } => session.tail(&pod, container.as_deref(), &path).await,
        Command::NodeShell { node } => session.node_shell(&node).await,
        Command::Config { .. } | Command::Version => Ok(()),
    }
}
