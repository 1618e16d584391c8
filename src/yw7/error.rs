//! Error types for yw7 project files.

use std::fmt;

/// Errors that can occur when reading or writing `.yw7` files.
#[derive(Debug)]
pub enum Yw7Error {
    /// A `.lock` sibling exists: the project is open in yWriter.
    Locked,

    /// The document could not be parsed or is structurally invalid.
    Malformed {
        /// Detailed message from the parser or validator.
        message: String,
    },

    /// A required element is missing from the document.
    MissingElement {
        /// Tag name of the missing element.
        tag: String,
    },

    /// The target file could not be written (the backup, if any, has been
    /// restored).
    Write {
        /// Path of the file that failed to write.
        path: String,
    },

    /// I/O error while reading the file.
    Io(std::io::Error),
}

impl fmt::Display for Yw7Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Yw7Error::Locked => {
                write!(f, "yWriter seems to be open. Please close first")
            }
            Yw7Error::Malformed { message } => {
                write!(f, "cannot process yw7 file: {message}")
            }
            Yw7Error::MissingElement { tag } => {
                write!(f, "invalid yw7 project: missing <{tag}> element")
            }
            Yw7Error::Write { path } => {
                write!(f, "cannot write file: \"{path}\"")
            }
            Yw7Error::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Yw7Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Yw7Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Yw7Error {
    fn from(err: std::io::Error) -> Self {
        Yw7Error::Io(err)
    }
}
