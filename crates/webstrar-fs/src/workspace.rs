use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Result, io_at};
use crate::replace::replace_dir;

/// A staging directory created next to its destination.
///
/// Content is written into [`Workspace::path`] and swapped into place by
/// [`Workspace::commit`]. Dropping an uncommitted workspace removes the
/// staging directory and leaves the destination untouched.
pub struct Workspace {
    staging: TempDir,
    destination: PathBuf,
}

impl Workspace {
    /// Stage beside `destination`, in the same parent directory, so the final
    /// swap is a rename on one filesystem. The parent is created if missing.
    pub fn beside(destination: impl AsRef<Path>) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let parent = destination.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(io_at(parent))?;

        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{name}.staging-"))
            .tempdir_in(parent)
            .map_err(io_at(parent))?;
        open_permissions(staging.path())?;

        Ok(Self {
            staging,
            destination,
        })
    }

    pub fn path(&self) -> &Path {
        self.staging.path()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn commit(self) -> Result<()> {
        replace_dir(self.staging.path(), &self.destination)?;
        // The staging path has been renamed away; dropping the handle finds
        // nothing left to remove.
        Ok(())
    }
}

/// Temporary directories are created owner-only; a committed slot must be
/// readable by the serving process.
#[cfg(unix)]
fn open_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(io_at(path))
}

#[cfg(not(unix))]
fn open_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
