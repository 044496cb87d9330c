//! Virtual document identifiers
//!
//! `<scheme>:<pod>:<namespace>:<container>:<path>`; the scheme picks the
//! remote read. The path is the last field and may itself contain colons.

use crate::kube::ContainerTarget;
use std::fmt;
use std::str::FromStr;

pub const FILE_VIEW_SCHEME: &str = "kubernetes-file-view";
pub const FOLDER_FIND_SCHEME: &str = "kubernetes-folder-find";
pub const FOLDER_LS_AL_SCHEME: &str = "kubernetes-folder-ls-al";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentUriError {
    #[error("Unknown document scheme: {0}")]
    UnknownScheme(String),

    #[error("Malformed document identifier: {0}")]
    Malformed(String),
}

/// Which remote read a document shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMode {
    /// `cat` of a file, shown as-is
    View,
    /// `find` under a folder
    Find,
    /// `ls -al` of a folder
    ListAll,
}

impl DocumentMode {
    pub const ALL: [Self; 3] = [Self::View, Self::Find, Self::ListAll];

    pub fn scheme(self) -> &'static str {
        match self {
            Self::View => FILE_VIEW_SCHEME,
            Self::Find => FOLDER_FIND_SCHEME,
            Self::ListAll => FOLDER_LS_AL_SCHEME,
        }
    }

    pub fn from_scheme(scheme: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.scheme() == scheme)
    }

    /// Remote command words run against the path
    pub fn command(self) -> &'static [&'static str] {
        match self {
            Self::View => &["cat"],
            Self::Find => &["find"],
            Self::ListAll => &["ls", "-al"],
        }
    }

    /// Command as shown to the operator
    pub fn command_label(self) -> String {
        self.command().join(" ")
    }
}

/// A decoded virtual document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentUri {
    pub mode: DocumentMode,
    pub target: ContainerTarget,
    pub path: String,
}

impl DocumentUri {
    pub fn new(mode: DocumentMode, target: ContainerTarget, path: impl Into<String>) -> Self {
        Self {
            mode,
            target,
            path: path.into(),
        }
    }

    /// The identifier body without the scheme
    pub fn body(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.target.pod_name(),
            self.target.namespace(),
            self.target.container,
            self.path
        )
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mode.scheme(), self.body())
    }
}

impl FromStr for DocumentUri {
    type Err = DocumentUriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, body) = s
            .split_once(':')
            .ok_or_else(|| DocumentUriError::Malformed(s.to_string()))?;
        let mode = DocumentMode::from_scheme(scheme)
            .ok_or_else(|| DocumentUriError::UnknownScheme(scheme.to_string()))?;

        let fields = body.splitn(4, ':').collect::<Vec<_>>();
        let [pod, namespace, container, path] = fields.as_slice() else {
            return Err(DocumentUriError::Malformed(s.to_string()));
        };
        if pod.is_empty() || namespace.is_empty() || path.is_empty() {
            return Err(DocumentUriError::Malformed(s.to_string()));
        }

        Ok(Self::new(
            mode,
            ContainerTarget::new(*pod, *namespace, *container),
            *path,
        ))
    }
}
