use std::io::{Read, Seek};
use std::path::Path;

use webstrar_fs::Workspace;

use crate::error::Result;
use crate::extract::extract_from_reader;
use crate::report::ArchiveReport;

/// An archive extracted into a staging directory beside its destination.
///
/// Nothing at the destination changes until [`WorkspaceExtraction::commit`].
pub struct WorkspaceExtraction {
    workspace: Workspace,
    report: ArchiveReport,
}

impl WorkspaceExtraction {
    /// Swap the staged tree into the destination, replacing what was there.
    pub fn commit(self) -> Result<ArchiveReport> {
        self.workspace.commit()?;
        Ok(self.report)
    }

    pub fn abort(self) {
        drop(self.workspace);
    }

    pub fn report(&self) -> &ArchiveReport {
        &self.report
    }

    pub fn staging_path(&self) -> &Path {
        self.workspace.path()
    }
}

/// Extract into a fresh staging directory next to `destination`.
///
/// On error the staging directory is removed and the destination is left as
/// it was.
pub fn extract_to_workspace<R: Read + Seek>(reader: R, destination: &Path) -> Result<WorkspaceExtraction> {
    let workspace = Workspace::beside(destination)?;
    let report = extract_from_reader(reader, workspace.path())?;
    Ok(WorkspaceExtraction { workspace, report })
}
