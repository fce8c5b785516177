//! Zip extraction into a destination directory.
//!
//! Entries are processed in archive order. Every entry name is resolved through
//! [`sanitize_entry_path`] before anything is written for it; the first entry
//! that escapes aborts the whole run, and no later entry is trusted.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use webstrar_fs::Sandbox;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::report::{ArchiveReport, ExtractedEntry};
use crate::sanitize::{is_directory_entry, sanitize_entry_path};

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Extract the zip file at `archive_path` into `destination`.
///
/// Existing files at the same paths are overwritten; nothing else under the
/// destination is removed.
pub fn extract_zip(archive_path: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    let archive_path = archive_path.as_ref();
    let file = File::open(archive_path).map_err(|source| Error::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;
    extract_from_reader(BufReader::new(file), destination)
}

/// Extract a zip archive read from `reader` into `destination`, creating the
/// destination if needed.
pub fn extract_from_reader<R: Read + Seek>(reader: R, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    let destination = destination.as_ref();
    std::fs::create_dir_all(destination).map_err(|source| Error::DirectoryCreationFailed {
        path: destination.to_path_buf(),
        source,
    })?;

    let sandbox = Sandbox::new(destination)?;
    let mut archive = ZipArchive::new(reader)?;
    let report = extract_entries(&mut archive, &sandbox)?;

    tracing::debug!(
        destination = %destination.display(),
        entries = report.entry_count,
        bytes = report.total_bytes,
        "archive extracted"
    );
    Ok(report)
}

fn extract_entries<R: Read + Seek>(archive: &mut ZipArchive<R>, sandbox: &Sandbox) -> Result<ArchiveReport> {
    let mut report = ArchiveReport::default();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_string();

        if file.is_dir() || is_directory_entry(&name) {
            tracing::trace!(entry = %name, "skipping directory entry");
            continue;
        }

        let sanitized = sanitize_entry_path(&name, sandbox)?;

        if file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            return Err(Error::SymlinkEntry {
                entry: sanitized.original,
            });
        }

        let size = write_file(&mut file, &sanitized.resolved)?;
        tracing::trace!(entry = %name, size, "extracted entry");

        report.push(ExtractedEntry {
            original_path: sanitized.original,
            target_path: sanitized.resolved,
            size,
        });
    }

    Ok(report)
}

fn write_file(reader: &mut impl Read, target_path: &Path) -> Result<u64> {
    if let Some(parent) = target_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    // A link left at the target (a symlink loop the sandbox gave up on) is
    // replaced, never written through.
    if std::fs::symlink_metadata(target_path).is_ok_and(|m| m.file_type().is_symlink()) {
        std::fs::remove_file(target_path).map_err(|e| Error::ExtractionFailed {
            path: target_path.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(target_path).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })?;
    std::io::copy(reader, &mut file).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })
}
