//! novelibre project file format (`.novx`).
//!
//! # Module Structure
//!
//! - `error` - error types for reading/writing novx files
//! - `read` - parse a `.novx` document into the model
//! - `write` - emit the model as a `.novx` document

pub mod error;
pub mod read;
pub mod write;

pub use error::NovxError;
pub use read::read_project;
pub use write::write_project;

/// Supported novx format version.
pub const MAJOR_VERSION: u32 = 1;
pub const MINOR_VERSION: u32 = 4;

/// Fixed file prolog; novelibre ships the DTD and stylesheet alongside
/// its projects, so both references are emitted verbatim.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE novx SYSTEM \"novx_1_4.dtd\">\n<?xml-stylesheet href=\"novx.css\" type=\"text/css\"?>\n";
