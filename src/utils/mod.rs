//! Shared helpers: file I/O, terminal styling, progress display.

pub mod fsio;
pub mod progress;
pub mod styling;

pub use fsio::{backup_path, read_xml_text, strip_illegal_characters, write_with_backup};
pub use progress::{create_spinner, finish_with_success};
pub use styling::{print_conversion, print_error, print_header, print_info, print_success};
