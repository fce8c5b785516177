use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {source}")]
    Corrupted { source: zip::result::ZipError },

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    PathTraversal { entry: PathBuf, resolved: PathBuf },

    #[error("entry path is empty, contains a null byte or names the destination itself: '{entry}'")]
    InvalidPath { entry: String },

    #[error("symlink entries are not extracted: '{entry}'")]
    SymlinkEntry { entry: PathBuf },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("workspace operation failed: {source}")]
    WorkspaceFailed { source: webstrar_fs::Error },
}

impl Error {
    /// Whether the archive tried to write outside its destination.
    pub fn is_path_traversal(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }
}

impl From<webstrar_fs::Error> for Error {
    fn from(e: webstrar_fs::Error) -> Self {
        Self::WorkspaceFailed { source: e }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupted { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
