use std::path::PathBuf;

/// Summary of one extraction run.
#[derive(Clone, Debug, Default)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<ExtractedEntry>,
}

#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    /// Entry name as stored in the archive, with `/` separators.
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
}

impl ArchiveReport {
    pub(crate) fn push(&mut self, entry: ExtractedEntry) {
        self.entry_count += 1;
        self.total_bytes += entry.size;
        self.entries.push(entry);
    }
}
