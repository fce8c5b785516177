use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct ReplaceDirOptions {
    retry_count: u32,
    retry_delay: Duration,
}

impl Default for ReplaceDirOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplaceDirOptions {
    pub fn new() -> Self {
        Self {
            retry_count: 5,
            retry_delay: Duration::from_millis(50),
        }
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count.max(1);
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

/// Move `src` into place at `dest`, replacing whatever directory was there.
///
/// The old directory is renamed aside first and restored if the final rename
/// fails, so `dest` is never left missing. The set-aside copy is removed once
/// the swap succeeds.
pub fn replace_dir(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    replace_dir_with_options(src, dest, ReplaceDirOptions::new())
}

pub fn replace_dir_with_options(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: ReplaceDirOptions,
) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    let backup = if dest.exists() {
        let backup = aside_path(dest);
        rename_with_retry(dest, &backup, options)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = rename_with_retry(src, dest, options) {
        if let Some(backup) = &backup {
            if let Err(restore) = std::fs::rename(backup, dest) {
                tracing::warn!(
                    backup = %backup.display(),
                    dest = %dest.display(),
                    error = %restore,
                    "failed to restore previous directory"
                );
            }
        }
        return Err(e);
    }

    if let Some(backup) = backup {
        if let Err(e) = std::fs::remove_dir_all(&backup) {
            tracing::warn!(path = %backup.display(), error = %e, "failed to remove replaced directory");
        }
    }

    Ok(())
}

fn rename_with_retry(from: &Path, to: &Path, options: ReplaceDirOptions) -> Result<()> {
    let mut attempts = 0;
    loop {
        match std::fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(source) => {
                attempts += 1;
                if attempts >= options.retry_count || source.kind() == std::io::ErrorKind::NotFound {
                    return Err(Error::ReplaceDir {
                        path: to.to_path_buf(),
                        source,
                    });
                }
                tracing::debug!(from = %from.display(), to = %to.display(), attempts, "rename failed, retrying");
                thread::sleep(options.retry_delay * attempts);
            }
        }
    }
}

fn aside_path(dest: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(".{name}.old-{}-{n}", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_missing_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("file.txt"), "data").unwrap();

        replace_dir(&src, &dest).unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read_to_string(dest.join("file.txt")).unwrap(), "data");
    }

    #[test]
    fn replaces_existing_destination_wholesale() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(dest.join("nested")).unwrap();
        std::fs::write(dest.join("nested/stale.txt"), "old").unwrap();
        std::fs::write(src.join("fresh.txt"), "new").unwrap();

        replace_dir(&src, &dest).unwrap();
        assert!(dest.join("fresh.txt").exists());
        assert!(!dest.join("nested").exists());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn failed_swap_keeps_previous_contents() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("keep.txt"), "old").unwrap();

        let options = ReplaceDirOptions::new().retry_count(1);
        let result = replace_dir_with_options(dir.path().join("missing"), &dest, options);

        assert!(matches!(result, Err(Error::ReplaceDir { .. })));
        assert_eq!(std::fs::read_to_string(dest.join("keep.txt")).unwrap(), "old");
    }
}
