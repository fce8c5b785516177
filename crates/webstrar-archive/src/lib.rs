//! Zip extraction confined to a destination directory.
//!
//! # Architecture
//!
//! - `sanitize.rs` - Entry path resolution (zip-slip prevention)
//! - `extract.rs` - Entry-by-entry extraction
//! - `workspace.rs` - Extraction into a staging directory, committed by swap
//! - `report.rs` - What was written

pub use error::{Error, Result};
pub use extract::{extract_from_reader, extract_zip};
pub use report::{ArchiveReport, ExtractedEntry};
pub use sanitize::{SanitizedPath, is_directory_entry, sanitize_entry_path};
pub use workspace::{WorkspaceExtraction, extract_to_workspace};

mod error;
mod extract;
mod report;
mod sanitize;
mod workspace;
