use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sandbox root must not be empty")]
    InvalidRoot,

    #[error("failed to access '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to replace directory '{path}': {source}")]
    ReplaceDir { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io { path, source }
}
