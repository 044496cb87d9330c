//! Favorite entry wire format and scope keys
//!
//! A persisted favorite is `<absolutePath>\0<entryType>`. The raw string never
//! leaves this module: callers work with [`FavoriteEntry`].

use crate::kube::PodContext;
use std::fmt;
use std::str::FromStr;

/// Sentinel standing in for "every namespace and pod"
pub const GLOBAL_SCOPE: &str = "###GLOBAL###";

/// Appended to every scope key before storage access
pub const FAVORITES_SUFFIX: &str = "_favorites";

const ENTRY_SEPARATOR: char = '\0';

/// Errors decoding a persisted favorite
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FavoriteEntryError {
    #[error("Favorite entry has an empty path")]
    EmptyPath,

    #[error("Unknown favorite scope: {0}")]
    UnknownScope(String),
}

/// What a favorite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteKind {
    File,
    Folder,
}

impl FavoriteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "containerfilenodefavorite",
            Self::Folder => "containerfoldernodefavorite",
        }
    }

    /// Anything that is not the file marker is a folder; entries written
    /// without a type are files.
    fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            None | Some("") => Self::File,
            Some(marker) if marker == Self::File.as_str() => Self::File,
            Some(_) => Self::Folder,
        }
    }
}

impl fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which persistence partition a favorite is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteScope {
    /// Namespace and pod name
    Explicit,
    /// Pod name in any namespace
    Pod,
    /// Every namespace and pod
    Global,
}

impl FavoriteScope {
    pub const ALL: [Self; 3] = [Self::Explicit, Self::Pod, Self::Global];

    /// Human readable choice offered when adding a favorite
    pub fn title(self) -> &'static str {
        match self {
            Self::Explicit => "Explicit Favorites (Namespace & pod name)",
            Self::Pod => "Pod Favorites (Pod name)",
            Self::Global => "Global Favorites (All namespaces & pods)",
        }
    }
}

impl FromStr for FavoriteScope {
    type Err = FavoriteEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "explicit" | "namespace" | "ns" => Ok(Self::Explicit),
            "pod" => Ok(Self::Pod),
            "global" | "all" => Ok(Self::Global),
            _ => Err(FavoriteEntryError::UnknownScope(s.to_string())),
        }
    }
}

/// Storage key of one favorites partition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Key for a scope as seen from a pod
    pub fn for_scope(scope: FavoriteScope, pod: &PodContext) -> Self {
        let base = match scope {
            FavoriteScope::Explicit => format!("{}_{}", pod.namespace, pod.pod_name),
            FavoriteScope::Pod => pod.pod_name.clone(),
            FavoriteScope::Global => GLOBAL_SCOPE.to_string(),
        };
        Self(format!("{base}{FAVORITES_SUFFIX}"))
    }

    /// All three keys visible from a pod, in resolution order
    pub fn all_for(pod: &PodContext) -> [Self; 3] {
        FavoriteScope::ALL.map(|scope| Self::for_scope(scope, pod))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bookmarked file or folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub path: String,
    pub kind: FavoriteKind,
}

impl FavoriteEntry {
    /// Folder paths are stored with their trailing separator
    pub fn new(path: impl Into<String>, kind: FavoriteKind) -> Self {
        let mut path = path.into();
        if kind == FavoriteKind::Folder && !path.ends_with('/') {
            path.push('/');
        }
        Self { path, kind }
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.path, ENTRY_SEPARATOR, self.kind.as_str())
    }

    pub fn decode(raw: &str) -> Result<Self, FavoriteEntryError> {
        let mut parts = raw.splitn(2, ENTRY_SEPARATOR);
        let path = parts.next().unwrap_or_default();
        if path.is_empty() {
            return Err(FavoriteEntryError::EmptyPath);
        }
        let kind = FavoriteKind::from_marker(parts.next());
        Ok(Self {
            path: path.to_string(),
            kind,
        })
    }

    /// Whether this entry names `path`, ignoring a folder's trailing separator
    pub fn matches_path(&self, path: &str) -> bool {
        self.path.trim_end_matches('/') == path.trim_end_matches('/')
    }

    /// Split into (path prefix, leaf name)
    ///
    /// The prefix always ends in `/`. For folders the stored trailing
    /// separator is dropped before the leaf is taken, so `/usr/bin/` gives
    /// (`/usr/`, `bin`) and `/` gives the root (`/`, ``).
    pub fn prefix_and_leaf(&self) -> (String, String) {
        let path = match self.kind {
            FavoriteKind::Folder => self.path.strip_suffix('/').unwrap_or(&self.path),
            FavoriteKind::File => self.path.as_str(),
        };
        match path.rsplit_once('/') {
            Some((prefix, leaf)) => (format!("{prefix}/"), leaf.to_string()),
            None => ("/".to_string(), path.to_string()),
        }
    }
}
