use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A root directory that caller- and archive-supplied paths must stay inside.
///
/// The root is canonicalized once at construction. Containment is decided on
/// canonical forms, component by component, ignoring ASCII and Unicode case.
#[derive(Clone, Debug)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(Error::InvalidRoot);
        }
        Ok(Self {
            root: canonicalize(root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `candidate` (absolute, or relative to the root) resolves to the
    /// root itself or something beneath it.
    pub fn contains(&self, candidate: impl AsRef<Path>) -> bool {
        let candidate = candidate.as_ref();
        let resolved = if candidate.is_absolute() {
            canonicalize(candidate)
        } else {
            canonicalize(self.root.join(candidate))
        };
        is_within(&self.root, &resolved)
    }

    /// Join `relative` onto the root and return the canonical result, or
    /// `None` when it escapes.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        let resolved = canonicalize(self.root.join(relative.as_ref()));
        is_within(&self.root, &resolved).then_some(resolved)
    }
}

/// Whether `candidate` stays within `root`.
///
/// # Panics
///
/// Panics when `root` is empty; an empty root would otherwise contain every
/// path.
pub fn contains(root: impl AsRef<Path>, candidate: impl AsRef<Path>) -> bool {
    match Sandbox::new(root) {
        Ok(sandbox) => sandbox.contains(candidate),
        Err(e) => panic!("{e}"),
    }
}

/// Symlink hops followed through missing targets before giving up.
const MAX_LINK_DEPTH: u32 = 40;

/// Resolve `path` to an absolute form free of `.` and `..`.
///
/// The longest existing prefix is resolved through the filesystem, following
/// symlinks; the missing remainder is appended as-is. Paths that do not exist
/// yet (extraction targets) therefore canonicalize without touching the disk
/// beyond their existing ancestors. A dangling symlink is not a missing
/// component: it resolves to wherever it points.
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
    resolve(path.as_ref(), MAX_LINK_DEPTH)
}

fn resolve(path: &Path, depth: u32) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let normalized = normalize(&absolute);

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = existing.canonicalize() {
            return append(resolved, &missing);
        }
        if depth > 0 {
            if let Ok(target) = std::fs::read_link(existing) {
                let base = existing.parent().unwrap_or(existing);
                return resolve(&append(base.join(target), &missing), depth - 1);
            }
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }
}

/// Append components collected leaf-first.
fn append(base: PathBuf, missing: &[std::ffi::OsString]) -> PathBuf {
    missing.iter().rev().fold(base, |acc, part| acc.join(part))
}

/// Lexically resolve `.` and `..` components. `..` never climbs above a root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(Component::RootDir.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}

fn is_within(root: &Path, candidate: &Path) -> bool {
    let mut candidate = candidate.components();
    root.components()
        .all(|r| candidate.next().is_some_and(|c| same_component(r, c)))
}

/// Case is ignored only where the filesystem ignores it; elsewhere a case
/// variant is a different directory.
fn same_component(a: Component<'_>, b: Component<'_>) -> bool {
    if a == b {
        return true;
    }
    CASE_INSENSITIVE_FS
        && a.as_os_str().to_string_lossy().to_lowercase() == b.as_os_str().to_string_lossy().to_lowercase()
}

const CASE_INSENSITIVE_FS: bool = cfg!(any(windows, target_os = "macos"));
