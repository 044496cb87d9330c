//! Remote command executor
//!
//! The only boundary between the explorer core and the cluster. Every remote
//! read, listing and copy goes through [`CommandExecutor::invoke`] with a kubectl
//! command line (without the leading `kubectl`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one kubectl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Runs a cluster CLI command and returns exit code, stdout and stderr.
///
/// An `Err` means the executor itself was unavailable (binary missing, spawn
/// failure). A command that ran but failed is an `Ok` with a non-zero code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn invoke(&self, command_line: &str) -> Result<CommandOutput>;
}

/// Executor backed by the local `kubectl` binary
#[derive(Debug, Clone)]
pub struct KubectlExecutor {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
}

impl KubectlExecutor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: None,
            context: None,
        }
    }

    /// Pin every invocation to a kubeconfig file
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    /// Pin every invocation to a kubeconfig context
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// Global flags prepended to every command line
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push(format!("--kubeconfig={}", kubeconfig.display()));
        }
        if let Some(context) = &self.context {
            args.push(format!("--context={context}"));
        }
        args
    }
}

impl KubectlExecutor {
    /// Run an interactive command (shell, tail, node shell) on the current
    /// terminal and return its exit code
    pub async fn attach(&self, command_line: &str) -> Result<i32> {
        let args = shell_words::split(command_line)
            .with_context(|| format!("Failed to parse kubectl command line: {command_line}"))?;

        tracing::debug!("kubectl {} (attached)", command_line);

        let status = Command::new(&self.binary)
            .args(self.global_args())
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;

        Ok(status.code().unwrap_or(-1))
    }
}

impl Default for KubectlExecutor {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

#[async_trait]
impl CommandExecutor for KubectlExecutor {
    async fn invoke(&self, command_line: &str) -> Result<CommandOutput> {
        let args = shell_words::split(command_line)
            .with_context(|| format!("Failed to parse kubectl command line: {command_line}"))?;

        tracing::debug!("kubectl {}", command_line);

        let output = Command::new(&self.binary)
            .args(self.global_args())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;

        let code = output.status.code().unwrap_or(-1);
        if code != 0 {
            tracing::debug!("kubectl {} exited with {}", command_line, code);
        }

        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
