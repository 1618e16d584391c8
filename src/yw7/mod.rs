//! yWriter 7 project file format (`.yw7`).
//!
//! # Module Structure
//!
//! - `error` - error types for reading/writing yw7 files
//! - `markup` - yw7 shortcode <-> novx paragraph markup conversion
//! - `read` - parse a `.yw7` document into the model
//! - `write` - emit the model as a `.yw7` document

pub mod error;
pub mod markup;
pub mod read;
pub mod write;

pub use error::Yw7Error;
pub use read::read_project;
pub use write::write_project;

use std::path::{Path, PathBuf};

/// yWriter lock file sibling: `project.yw7.lock`.
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// The project is open in yWriter while the lock file exists.
pub fn is_locked(path: &Path) -> bool {
    lock_path(path).is_file()
}
