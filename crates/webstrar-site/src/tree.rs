use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use webstrar_fs::Sandbox;

/// A file or directory below a browse root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileNode {
    pub name: String,
    /// Path from the browse root, always `/`-separated.
    pub relative_path: String,
    pub is_directory: bool,
    /// Byte length for files, zero for directories.
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub children: Vec<FileNode>,
}

/// List everything under `root`: subdirectories first, then files, each group
/// sorted by name, directories expanded recursively. A missing root yields an
/// empty list. Symlinks are not listed.
pub fn build_tree(root: impl AsRef<Path>) -> Vec<FileNode> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Vec::new();
    }
    list_dir(root, root)
}

fn list_dir(root: &Path, dir: &Path) -> Vec<FileNode> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let file_type = metadata.file_type();
        if file_type.is_symlink() || !(file_type.is_dir() || file_type.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let last_modified: DateTime<Utc> = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH).into();
        let node = FileNode {
            name: entry.file_name().to_string_lossy().into_owned(),
            relative_path: slash_path(relative),
            is_directory: file_type.is_dir(),
            size: if file_type.is_dir() { 0 } else { metadata.len() },
            last_modified,
            children: Vec::new(),
        };

        if node.is_directory {
            dirs.push((node, path));
        } else {
            files.push(node);
        }
    }

    dirs.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));

    dirs.into_iter()
        .map(|(mut node, path)| {
            node.children = list_dir(root, &path);
            node
        })
        .chain(files)
        .collect()
}

/// Read `relative` under `root` as text.
///
/// Returns `None` when the path escapes `root` after canonicalization
/// (including through symlinks), does not exist, is not a regular file, or
/// cannot be read. Invalid UTF-8 is replaced and a leading BOM is dropped.
pub fn read_file(root: impl AsRef<Path>, relative: &str) -> Option<String> {
    let root = root.as_ref();
    if relative.trim().is_empty() || relative.contains('\0') {
        return None;
    }

    let sandbox = Sandbox::new(root).ok()?;
    let Some(resolved) = sandbox.resolve(relative.replace('\\', "/")) else {
        tracing::warn!(root = %root.display(), path = relative, "rejected file read outside root");
        return None;
    };

    if !std::fs::metadata(&resolved).is_ok_and(|m| m.is_file()) {
        return None;
    }

    match std::fs::read(&resolved) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            Some(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
        }
        Err(e) => {
            tracing::debug!(path = %resolved.display(), error = %e, "failed to read file");
            None
        }
    }
}

pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
