//! Course-site deploy layout and read views.
//!
//! A deploy root holds one `website<N>` folder per site, each with a fixed set
//! of `Page<i>` slots. Uploaded zip archives replace a slot's contents; the
//! slots are then browsed as file trees and read file by file.

pub use browser::{FileView, SiteBrowser};
pub use config::{DeployConfig, DeployStrategy};
pub use deploy::{DeployReport, Deployer};
pub use directory::{SiteDirectory, StaticDirectory, normalize_user};
pub use error::{Error, Result};
pub use language::Language;
pub use overview::{SiteOverview, overviews};
pub use slot::{PageSlot, SITE_PREFIX, SLOT_PREFIX, SlotLayout, SlotName};
pub use tree::{FileNode, build_tree, read_file};

mod browser;
mod config;
mod deploy;
mod directory;
mod error;
mod language;
mod overview;
mod slot;
mod tree;
