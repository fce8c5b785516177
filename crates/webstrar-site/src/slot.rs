use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DeployConfig;
use crate::error::{Error, Result};

/// Folder name prefix of a site under the deploy root: `website<N>`.
pub const SITE_PREFIX: &str = "website";
/// Folder name prefix of a page slot under a site: `Page<i>`.
pub const SLOT_PREFIX: &str = "Page";

/// A validated page slot index, displayed in its canonical `Page<i>` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotName(usize);

impl SlotName {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SLOT_PREFIX}{}", self.0)
    }
}

impl Serialize for SlotName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Status of one page slot as found on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageSlot {
    pub name: String,
    pub index: usize,
    pub exists: bool,
    pub has_content: bool,
    pub file_count: usize,
    pub last_modified: Option<DateTime<Utc>>,
    /// The configured entry document sits at the slot root.
    pub has_default_document: bool,
    /// Landing page picked by the entry-document heuristic, relative to the
    /// slot root with `/` separators.
    pub entry_document: Option<String>,
    /// Root-level documents with the entry extension, sorted case-insensitively.
    pub entry_candidates: Vec<String>,
}

#[derive(Debug)]
struct SlotFile {
    relative: String,
    modified: SystemTime,
}

impl SlotFile {
    fn is_root_level(&self) -> bool {
        !self.relative.contains('/')
    }

    fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }
}

/// Maps (site, page) pairs onto `<root>/website<N>/Page<i>` and probes the
/// resulting folders.
#[derive(Clone, Debug)]
pub struct SlotLayout {
    config: DeployConfig,
}

impl SlotLayout {
    pub fn new(config: DeployConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotName> + use<> {
        (0..self.config.slot_count).map(SlotName)
    }

    /// Match `name` against the canonical slot names, ignoring case and
    /// surrounding whitespace.
    pub fn parse_slot(&self, name: &str) -> Result<SlotName> {
        let trimmed = name.trim();
        self.slots()
            .find(|slot| slot.to_string().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidSlot {
                name: name.to_string(),
                last: self.config.slot_count - 1,
            })
    }

    pub fn site_folder(&self, site: u32) -> PathBuf {
        self.config.root.join(format!("{SITE_PREFIX}{site}"))
    }

    pub fn slot_folder(&self, site: u32, slot: SlotName) -> PathBuf {
        self.site_folder(site).join(slot.to_string())
    }

    /// Compose the folder for `page` of `site` without touching the disk.
    pub fn resolve_slot_folder(&self, site: u32, page: &str) -> Result<PathBuf> {
        let slot = self.parse_slot(page)?;
        Ok(self.slot_folder(site, slot))
    }

    /// Like [`SlotLayout::slot_folder`], but also checks the result against
    /// the deploy root before it is used for any read or write.
    pub fn checked_slot_folder(&self, site: u32, slot: SlotName) -> Result<PathBuf> {
        let folder = self.slot_folder(site, slot);
        if !webstrar_fs::contains(&self.config.root, &folder) {
            tracing::warn!(folder = %folder.display(), "slot folder escapes deploy root");
            return Err(Error::PathTraversal { path: folder });
        }
        Ok(folder)
    }

    /// Status of every slot of `site`, in index order, whether or not the
    /// folders exist.
    pub fn slot_statuses(&self, site: u32) -> Vec<PageSlot> {
        self.slots()
            .map(|slot| self.probe(slot, &self.slot_folder(site, slot)))
            .collect()
    }

    fn probe(&self, slot: SlotName, folder: &Path) -> PageSlot {
        let mut status = PageSlot {
            name: slot.to_string(),
            index: slot.index(),
            ..PageSlot::default()
        };

        if !folder.is_dir() {
            return status;
        }
        status.exists = true;

        let mut files = Vec::new();
        collect_files(folder, folder, &mut files);

        status.file_count = files.len();
        status.has_content = !files.is_empty();
        status.last_modified = files.iter().map(|f| f.modified).max().map(DateTime::<Utc>::from);

        let entry_document = &self.config.entry_document;
        let extension = self.config.entry_extension();

        status.has_default_document = files
            .iter()
            .any(|f| f.is_root_level() && f.relative.eq_ignore_ascii_case(entry_document));
        status.entry_document = choose_entry_document(&files, entry_document, extension);

        let mut candidates: Vec<String> = files
            .iter()
            .filter(|f| f.is_root_level() && has_extension(&f.relative, extension))
            .map(|f| f.relative.clone())
            .collect();
        candidates.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        status.entry_candidates = candidates;

        status
    }
}

/// Pick a landing page only when a tier yields exactly one candidate:
/// the entry document at the root, else the single root document with the
/// entry extension, else the single entry document anywhere below.
fn choose_entry_document(files: &[SlotFile], entry_document: &str, extension: &str) -> Option<String> {
    let root_files = || files.iter().filter(|f| f.is_root_level());

    // Exact case first, then the ordinal-first spelling, so the pick does not
    // depend on directory listing order.
    let named = root_files()
        .filter(|f| f.relative.eq_ignore_ascii_case(entry_document))
        .min_by(|a, b| {
            (a.relative != entry_document)
                .cmp(&(b.relative != entry_document))
                .then_with(|| a.relative.cmp(&b.relative))
        });
    if let Some(file) = named {
        return Some(file.relative.clone());
    }

    if let Some(file) = single(root_files().filter(|f| has_extension(&f.relative, extension))) {
        return Some(file.relative.clone());
    }

    single(files.iter().filter(|f| f.file_name().eq_ignore_ascii_case(entry_document)))
        .map(|f| f.relative.clone())
}

fn single<T>(mut iter: impl Iterator<Item = T>) -> Option<T> {
    match (iter.next(), iter.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// Recursively gather regular files under `dir`. Symlinks are skipped and
/// unreadable entries are ignored, since the folder may be mid-replacement.
fn collect_files(root: &Path, dir: &Path, files: &mut Vec<SlotFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            collect_files(root, &path, files);
        } else if file_type.is_file() {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(SlotFile {
                relative: crate::tree::slash_path(relative),
                modified,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &Path) -> SlotLayout {
        SlotLayout::new(DeployConfig::new(root)).unwrap()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn base() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"C:\WebstrarDeploy")
        } else {
            PathBuf::from("/srv/webstrar")
        }
    }

    #[test]
    fn slot_folder_layout() {
        let layout = layout(&base());
        let folder = layout.resolve_slot_folder(7, "Page3").unwrap();
        assert_eq!(folder, base().join("website7").join("Page3"));
    }

    #[test]
    fn page_names_match_case_insensitively() {
        let layout = layout(&base());
        assert_eq!(layout.parse_slot(" page10 ").unwrap().to_string(), "Page10");
        assert_eq!(layout.parse_slot("PAGE0").unwrap().index(), 0);
    }

    #[test]
    fn unknown_page_names_are_rejected() {
        let layout = layout(&base());
        for name in ["Page11", "Page01", "", "../Page1", "Page-1", "Page3/.."] {
            assert!(
                matches!(layout.parse_slot(name), Err(Error::InvalidSlot { .. })),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn reduced_slot_count_limits_names() {
        let layout = SlotLayout::new(DeployConfig::new(base()).slot_count(2)).unwrap();
        assert!(layout.parse_slot("Page1").is_ok());
        assert!(layout.parse_slot("Page2").is_err());
        assert_eq!(layout.slots().count(), 2);
    }

    #[test]
    fn statuses_cover_every_slot_even_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        touch(&layout.resolve_slot_folder(4, "Page2").unwrap().join("index.html"));

        let statuses = layout.slot_statuses(4);
        assert_eq!(statuses.len(), 11);
        for (i, status) in statuses.iter().enumerate() {
            assert_eq!(status.index, i);
            assert_eq!(status.name, format!("Page{i}"));
        }
        assert!(statuses[2].exists && statuses[2].has_content);
        assert_eq!(statuses[2].file_count, 1);
        assert!(statuses[2].last_modified.is_some());
        assert!(!statuses[0].exists);
        assert_eq!(statuses[0].last_modified, None);
        assert_eq!(statuses[0].entry_document, None);
    }

    #[test]
    fn empty_slot_has_no_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        std::fs::create_dir_all(layout.resolve_slot_folder(1, "Page0").unwrap().join("empty")).unwrap();

        let status = &layout.slot_statuses(1)[0];
        assert!(status.exists);
        assert!(!status.has_content);
        assert_eq!(status.file_count, 0);
        assert_eq!(status.last_modified, None);
    }

    fn entry_for(files: &[&str]) -> PageSlot {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        let folder = layout.resolve_slot_folder(1, "Page0").unwrap();
        for file in files {
            touch(&folder.join(file));
        }
        layout.slot_statuses(1).remove(0)
    }

    #[test]
    fn default_document_wins_at_root() {
        let status = entry_for(&["Default.aspx", "other.aspx"]);
        assert_eq!(status.entry_document.as_deref(), Some("Default.aspx"));
        assert!(status.has_default_document);
        assert_eq!(status.entry_candidates, vec!["Default.aspx", "other.aspx"]);
    }

    #[test]
    fn default_document_match_ignores_case() {
        let status = entry_for(&["default.ASPX", "zeta.aspx"]);
        assert_eq!(status.entry_document.as_deref(), Some("default.ASPX"));
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    #[test]
    fn exact_case_default_document_wins_over_variants() {
        let status = entry_for(&["default.aspx", "DEFAULT.ASPX", "Default.aspx"]);
        assert_eq!(status.entry_document.as_deref(), Some("Default.aspx"));

        let status = entry_for(&["default.aspx", "DEFAULT.ASPX"]);
        assert_eq!(status.entry_document.as_deref(), Some("DEFAULT.ASPX"));
    }

    #[test]
    fn single_root_document_is_chosen() {
        let status = entry_for(&["home.aspx", "styles.css"]);
        assert_eq!(status.entry_document.as_deref(), Some("home.aspx"));
        assert!(!status.has_default_document);
    }

    #[test]
    fn ambiguous_root_documents_pick_nothing() {
        let status = entry_for(&["b.aspx", "a.aspx"]);
        assert_eq!(status.entry_document, None);
        assert_eq!(status.entry_candidates, vec!["a.aspx", "b.aspx"]);
    }

    #[test]
    fn single_nested_default_document_is_chosen() {
        let status = entry_for(&["site/pages/Default.aspx", "readme.txt"]);
        assert_eq!(status.entry_document.as_deref(), Some("site/pages/Default.aspx"));
        assert!(status.entry_candidates.is_empty());
    }

    #[test]
    fn multiple_nested_default_documents_pick_nothing() {
        let status = entry_for(&["a/Default.aspx", "b/Default.aspx"]);
        assert_eq!(status.entry_document, None);
    }

    #[test]
    fn candidates_sort_case_insensitively() {
        let status = entry_for(&["beta.aspx", "Alpha.aspx", "gamma.ASPX", "nested/zed.aspx"]);
        assert_eq!(status.entry_candidates, vec!["Alpha.aspx", "beta.aspx", "gamma.ASPX"]);
        assert_eq!(status.file_count, 4);
    }
}
