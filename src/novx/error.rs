//! Error types for novx project files.

use std::fmt;

/// Errors that can occur when reading or writing `.novx` files.
#[derive(Debug)]
pub enum NovxError {
    /// The document root is not a `novx` element.
    BadRoot {
        /// Path of the offending file.
        path: String,
    },

    /// The root carries no parsable `version` attribute.
    NoVersion {
        /// Path of the offending file.
        path: String,
    },

    /// The file was created by a newer novelibre than this tool supports.
    NewerVersion {
        /// Path of the offending file.
        path: String,
    },

    /// The file uses an outdated major format version.
    OlderVersion {
        /// Path of the offending file.
        path: String,
    },

    /// The document parsed, but its project data is inconsistent.
    Corrupt {
        /// What was wrong.
        message: String,
    },

    /// The document could not be parsed at all.
    Malformed {
        /// Detailed message from the parser.
        message: String,
    },

    /// The target file could not be written.
    Write {
        /// Path of the file that failed to write.
        path: String,
    },

    /// I/O error while reading the file.
    Io(std::io::Error),
}

impl fmt::Display for NovxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NovxError::BadRoot { path } => {
                write!(f, "no valid xml root element found in file: \"{path}\"")
            }
            NovxError::NoVersion { path } => {
                write!(f, "no valid version found in file: \"{path}\"")
            }
            NovxError::NewerVersion { path } => {
                write!(
                    f,
                    "the project \"{path}\" was created with a newer novelibre version"
                )
            }
            NovxError::OlderVersion { path } => {
                write!(
                    f,
                    "the project \"{path}\" was created with an outdated novelibre version"
                )
            }
            NovxError::Corrupt { message } => {
                write!(f, "corrupt project data ({message})")
            }
            NovxError::Malformed { message } => {
                write!(f, "cannot process novx file: {message}")
            }
            NovxError::Write { path } => {
                write!(f, "cannot write file: \"{path}\"")
            }
            NovxError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for NovxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NovxError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NovxError {
    fn from(err: std::io::Error) -> Self {
        NovxError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_newer_version_display() {
        let err = NovxError::NewerVersion {
            path: "book.novx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "the project \"book.novx\" was created with a newer novelibre version"
        );
    }

    #[test]
    fn test_corrupt_display() {
        let err = NovxError::Corrupt {
            message: "bad ID: 'xx1'".to_string(),
        };
        assert_eq!(err.to_string(), "corrupt project data (bad ID: 'xx1')");
    }

    #[test]
    fn test_bad_root_display() {
        let err = NovxError::BadRoot {
            path: "f.novx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no valid xml root element found in file: \"f.novx\""
        );
    }

    #[test]
    fn test_io_source() {
        let err = NovxError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(NovxError::NewerVersion { path: String::new() }.source().is_none());
    }
}
