//! Filesystem primitives bounded by a single root directory.
//!
//! - `sandbox.rs` - Canonicalization and containment checks
//! - `replace.rs` - Directory swap with rollback
//! - `workspace.rs` - Staging directory committed with a swap

mod error;
mod replace;
mod sandbox;
mod workspace;

pub use error::{Error, Result};
pub use replace::{ReplaceDirOptions, replace_dir, replace_dir_with_options};
pub use sandbox::{Sandbox, canonicalize, contains, normalize};
pub use workspace::Workspace;
