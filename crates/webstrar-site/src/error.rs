use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid page '{name}': expected Page0..Page{last}")]
    InvalidSlot { name: String, last: usize },

    #[error("path escapes the deploy root: '{path}'")]
    PathTraversal { path: PathBuf },

    #[error("invalid deploy configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to prepare deploy folder '{path}': {source}")]
    Prepare {
        path: PathBuf,
        source: webstrar_fs::Error,
    },

    #[error("failed to extract archive: {0}")]
    Extract(#[from] webstrar_archive::Error),

    #[error("failed to swap deployed folder into place: {0}")]
    Commit(#[source] webstrar_fs::Error),

    #[error("failed to store uploaded archive: {source}")]
    Upload { source: io::Error },

    #[error("uploaded archive is empty")]
    EmptyUpload,

    #[error("uploaded archive exceeds {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("no site assignment found for '{user}'")]
    UnknownUser { user: String },
}

impl Error {
    /// Whether the failure came from untrusted input rather than the host.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::InvalidSlot { .. }
            | Self::PathTraversal { .. }
            | Self::EmptyUpload
            | Self::UploadTooLarge { .. }
            | Self::UnknownUser { .. } => true,
            Self::Extract(e) => matches!(
                e,
                webstrar_archive::Error::PathTraversal { .. }
                    | webstrar_archive::Error::SymlinkEntry { .. }
                    | webstrar_archive::Error::InvalidPath { .. }
                    | webstrar_archive::Error::Corrupted { .. }
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
