use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::directory::SiteDirectory;
use crate::slot::{PageSlot, SlotLayout};

/// One site's users and slot statuses.
#[derive(Clone, Debug, Serialize)]
pub struct SiteOverview {
    pub site_number: u32,
    pub users: Vec<String>,
    pub pages: Vec<PageSlot>,
}

impl SiteOverview {
    pub fn new(layout: &SlotLayout, site_number: u32, users: Vec<String>) -> Self {
        Self {
            site_number,
            users,
            pages: layout.slot_statuses(site_number),
        }
    }

    pub fn total_files(&self) -> usize {
        self.pages.iter().map(|p| p.file_count).sum()
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.pages.iter().filter_map(|p| p.last_modified).max()
    }
}

/// Overviews of every assigned site in ascending order, leaving out
/// `excluded` (staff sites).
pub fn overviews(
    layout: &SlotLayout,
    directory: &dyn SiteDirectory,
    excluded: &BTreeSet<u32>,
) -> Vec<SiteOverview> {
    directory
        .assignments()
        .into_iter()
        .filter(|(site, _)| !excluded.contains(site))
        .map(|(site, users)| SiteOverview::new(layout, site, users))
        .collect()
}
