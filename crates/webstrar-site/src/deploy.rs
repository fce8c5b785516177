//! Replacing a slot's contents with an uploaded zip archive.
//!
//! The upload is spooled to a temporary archive file first. That file is
//! deleted once the deploy finishes, whether it succeeded or not. Concurrent
//! deploys to the same slot are not coordinated; each swap is whole, so the
//! last one to commit wins.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use webstrar_archive::{ArchiveReport, extract_to_workspace, extract_zip};

use crate::config::DeployStrategy;
use crate::directory::{SiteDirectory, normalize_user};
use crate::error::{Error, Result};
use crate::slot::{SlotLayout, SlotName};

/// Outcome of a successful deploy.
#[derive(Clone, Debug, Serialize)]
pub struct DeployReport {
    pub site_number: u32,
    pub page: SlotName,
    pub folder: PathBuf,
    pub extracted: usize,
    pub total_bytes: u64,
}

#[derive(Clone, Debug)]
pub struct Deployer {
    layout: SlotLayout,
}

impl Deployer {
    pub fn new(layout: SlotLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// Deploy for `user`, looking up their site in `directory`.
    pub fn deploy_for_user(
        &self,
        directory: &dyn SiteDirectory,
        user: &str,
        page: &str,
        upload: impl Read,
    ) -> Result<DeployReport> {
        let user = normalize_user(user);
        let site = directory
            .site_for(&user)
            .ok_or_else(|| Error::UnknownUser { user: user.clone() })?;
        tracing::debug!(user = %user, site, "resolved site assignment");
        self.deploy(site, page, upload)
    }

    /// Replace the contents of `page` of `site` with the zip archive read
    /// from `upload`.
    ///
    /// The page name is validated and the slot folder checked against the
    /// deploy root before anything touches the disk.
    pub fn deploy(&self, site: u32, page: &str, mut upload: impl Read) -> Result<DeployReport> {
        let slot = self.layout.parse_slot(page)?;
        let folder = self.layout.checked_slot_folder(site, slot)?;

        let archive = self.spool(&mut upload, site, slot)?;
        let outcome = self.install(archive.path(), &folder);
        if let Err(e) = archive.close() {
            tracing::warn!(error = %e, "failed to delete uploaded archive");
        }
        let report = outcome?;

        tracing::info!(
            site,
            page = %slot,
            extracted = report.entry_count,
            bytes = report.total_bytes,
            "deployed archive"
        );

        Ok(DeployReport {
            site_number: site,
            page: slot,
            folder,
            extracted: report.entry_count,
            total_bytes: report.total_bytes,
        })
    }

    fn spool(&self, upload: &mut impl Read, site: u32, slot: SlotName) -> Result<NamedTempFile> {
        let config = self.layout.config();
        let mut archive = tempfile::Builder::new()
            .prefix(&format!("webstrar_{site}_{slot}_"))
            .suffix(".zip")
            .tempfile_in(config.spool_dir())
            .map_err(|source| Error::Upload { source })?;

        let limit = config.max_upload_bytes;
        let written = std::io::copy(&mut upload.take(limit.saturating_add(1)), archive.as_file_mut())
            .map_err(|source| Error::Upload { source })?;

        if written == 0 {
            return Err(Error::EmptyUpload);
        }
        if written > limit {
            return Err(Error::UploadTooLarge { limit });
        }

        tracing::debug!(path = %archive.path().display(), bytes = written, "spooled upload");
        Ok(archive)
    }

    fn install(&self, archive_path: &Path, folder: &Path) -> Result<ArchiveReport> {
        match self.layout.config().strategy {
            DeployStrategy::Staged => install_staged(archive_path, folder),
            DeployStrategy::ClearThenExtract => install_in_place(archive_path, folder),
        }
    }
}

fn install_staged(archive_path: &Path, folder: &Path) -> Result<ArchiveReport> {
    let file = File::open(archive_path).map_err(|source| Error::Upload { source })?;

    let extraction = extract_to_workspace(BufReader::new(file), folder).map_err(|e| match e {
        webstrar_archive::Error::WorkspaceFailed { source } => Error::Prepare {
            path: folder.to_path_buf(),
            source,
        },
        other => Error::Extract(other),
    })?;

    extraction.commit().map_err(|e| match e {
        webstrar_archive::Error::WorkspaceFailed { source } => Error::Commit(source),
        other => Error::Extract(other),
    })
}

fn install_in_place(archive_path: &Path, folder: &Path) -> Result<ArchiveReport> {
    let prepare = |source| Error::Prepare {
        path: folder.to_path_buf(),
        source: webstrar_fs::Error::Io {
            path: folder.to_path_buf(),
            source,
        },
    };

    if folder.exists() {
        std::fs::remove_dir_all(folder).map_err(prepare)?;
    }
    std::fs::create_dir_all(folder).map_err(prepare)?;

    Ok(extract_zip(archive_path, folder)?)
}
