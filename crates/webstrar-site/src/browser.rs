use serde::Serialize;

use crate::error::Result;
use crate::language::Language;
use crate::slot::{PageSlot, SlotLayout};
use crate::tree::{FileNode, build_tree, read_file};

/// A single file opened for viewing.
#[derive(Clone, Debug, Serialize)]
pub struct FileView {
    pub site_number: u32,
    pub page: String,
    pub path: String,
    pub file_name: String,
    pub language: Language,
    pub content: String,
}

/// Read-only views of deployed slots for staff browsing.
#[derive(Clone, Debug)]
pub struct SiteBrowser {
    layout: SlotLayout,
}

impl SiteBrowser {
    pub fn new(layout: SlotLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    pub fn statuses(&self, site: u32) -> Vec<PageSlot> {
        self.layout.slot_statuses(site)
    }

    pub fn tree(&self, site: u32, page: &str) -> Result<Vec<FileNode>> {
        let slot = self.layout.parse_slot(page)?;
        let folder = self.layout.checked_slot_folder(site, slot)?;
        Ok(build_tree(folder))
    }

    /// Open `path` (relative to the slot) for viewing. `Ok(None)` covers both
    /// missing files and paths that resolve outside the slot.
    pub fn file(&self, site: u32, page: &str, path: &str) -> Result<Option<FileView>> {
        let slot = self.layout.parse_slot(page)?;
        let folder = self.layout.checked_slot_folder(site, slot)?;

        let Some(content) = read_file(&folder, path) else {
            return Ok(None);
        };

        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path).to_string();
        Ok(Some(FileView {
            site_number: site,
            page: slot.to_string(),
            path: path.to_string(),
            language: Language::classify(&file_name),
            file_name,
            content,
        }))
    }
}
