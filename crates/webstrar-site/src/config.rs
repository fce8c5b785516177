use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_SLOT_COUNT: usize = 11;
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

/// How a deploy replaces a slot's previous contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployStrategy {
    /// Extract into a staging sibling and swap it in. A failed extraction
    /// leaves the previous contents live.
    #[default]
    Staged,
    /// Delete the slot, recreate it empty, then extract into it. A failed
    /// extraction leaves the slot partially filled.
    ClearThenExtract,
}

/// Deploy root and slot conventions, passed to every component explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub root: PathBuf,
    pub slot_count: usize,
    /// File name that marks a slot's landing page, matched case-insensitively.
    pub entry_document: String,
    /// Extension (no dot) of documents eligible as a landing page.
    pub entry_extension: String,
    /// Where uploaded archives are spooled. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
    pub max_upload_bytes: u64,
    pub strategy: DeployStrategy,
}

impl Default for DeployConfig {
    fn default() -> Self {
        let root = if cfg!(windows) {
            PathBuf::from(r"C:\WebstrarDeploy")
        } else {
            PathBuf::from("/var/lib/webstrar/deploy")
        };
        Self {
            root,
            slot_count: DEFAULT_SLOT_COUNT,
            entry_document: "Default.aspx".to_string(),
            entry_extension: "aspx".to_string(),
            temp_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            strategy: DeployStrategy::default(),
        }
    }
}

impl DeployConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn slot_count(mut self, slot_count: usize) -> Self {
        self.slot_count = slot_count;
        self
    }

    pub fn temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    pub fn max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn strategy(mut self, strategy: DeployStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn spool_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn entry_extension(&self) -> &str {
        self.entry_extension.trim_start_matches('.')
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(Error::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.root.as_os_str().is_empty() {
            return invalid("deploy root is empty");
        }
        if !self.root.is_absolute() {
            return invalid("deploy root must be an absolute path");
        }
        if self.slot_count == 0 {
            return invalid("slot count must be at least 1");
        }
        if self.entry_document.is_empty() || Path::new(&self.entry_document).components().count() != 1 {
            return invalid("entry document must be a bare file name");
        }
        if self.max_upload_bytes == 0 {
            return invalid("upload limit must be positive");
        }
        Ok(())
    }
}
