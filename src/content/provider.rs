//! Remote content provider: virtual document to live command output

use super::uri::{DocumentMode, DocumentUri};
use crate::kube::{CommandExecutor, commands};
use crate::notify::{Notice, Notifier};
use std::sync::Arc;

/// Resolves virtual documents by running `cat`, `find` or `ls -al` remotely
///
/// Always produces text: a failed command renders the attempted command line
/// and the captured error stream.
#[derive(Clone)]
pub struct ContentProvider {
    executor: Arc<dyn CommandExecutor>,
    notifier: Arc<dyn Notifier>,
}

impl ContentProvider {
    pub fn new(executor: Arc<dyn CommandExecutor>, notifier: Arc<dyn Notifier>) -> Self {
        Self { executor, notifier }
    }

    pub async fn provide(&self, uri: &DocumentUri) -> String {
        let mut words: Vec<&str> = uri.mode.command().to_vec();
        words.push(uri.path.as_str());
        let command_line = commands::exec(&uri.target, &words);
        let label = format!("{} {}", uri.mode.command_label(), uri.path);

        let output = match self.executor.invoke(&command_line).await {
            Ok(output) => output,
            Err(e) => {
                self.notifier.notify(Notice::error(format!(
                    "Can't get data: unable to run kubectl ({e:#})"
                )));
                return format!("{label}\n {e:#}");
            }
        };

        if !output.is_success() {
            self.notifier.notify(Notice::error(format!(
                "Can't get data: {}",
                output.stderr.trim()
            )));
            return format!("{label}\n {}", output.stderr);
        }

        let content = match uri.mode {
            DocumentMode::View => output.stdout,
            DocumentMode::Find | DocumentMode::ListAll => format!("{label}\n\n{}", output.stdout),
        };
        if content.is_empty() {
            uri.to_string()
        } else {
            content
        }
    }
}
