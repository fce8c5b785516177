use std::path::PathBuf;

use webstrar_fs::{Sandbox, canonicalize};

use crate::error::{Error, Result};

/// Result of resolving an archive entry name against the destination.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    pub original: PathBuf,
    pub resolved: PathBuf,
}

/// Whether an entry name denotes a directory (trailing separator, empty base
/// name). Such entries carry no content and are skipped.
pub fn is_directory_entry(name: &str) -> bool {
    name.ends_with('/') || name.ends_with('\\')
}

/// Resolve an archive entry name to its target path under `destination`.
///
/// Backslashes are treated as separators. The joined path is canonicalized and
/// must stay inside the destination; anything else is a zip-slip attempt and
/// fails with [`Error::PathTraversal`].
pub fn sanitize_entry_path(name: &str, destination: &Sandbox) -> Result<SanitizedPath> {
    if name.is_empty() || name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    let original = PathBuf::from(name.replace('\\', "/"));
    let resolved = canonicalize(destination.root().join(&original));

    if !destination.contains(&resolved) {
        tracing::warn!(
            entry = %original.display(),
            resolved = %resolved.display(),
            "archive entry escapes destination"
        );
        return Err(Error::PathTraversal { entry: original, resolved });
    }

    if resolved == destination.root() || resolved.parent().is_none() {
        return Err(Error::InvalidPath {
            entry: name.to_string(),
        });
    }

    Ok(SanitizedPath { original, resolved })
}
