//! Read-only virtual documents backed by remote command output

mod provider;
mod uri;

pub use provider::ContentProvider;
pub use uri::{
    DocumentMode, DocumentUri, DocumentUriError, FILE_VIEW_SCHEME, FOLDER_FIND_SCHEME,
    FOLDER_LS_AL_SCHEME,
};
