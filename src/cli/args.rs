//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

/// yw-novx - Convert yWriter 7 projects to and from the novelibre format
#[derive(Parser, Debug)]
#[command(name = "yw-novx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file: a .yw7 or .novx project, or a .pwc collection manifest.
    /// The conversion direction follows from the extension.
    pub source: PathBuf,

    /// Suffix inserted before the target extension
    /// (book.yw7 with suffix '_bak' converts to book_bak.novx)
    #[arg(short, long, default_value = "")]
    pub suffix: String,

    /// Suppress status output (errors still print)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// The derived target path, or None for an unsupported extension.
    pub fn target_path(&self) -> Option<PathBuf> {
        derive_target(&self.source, &self.suffix)
    }
}

/// Sibling target path: same directory and stem, the suffix inserted, and
/// the extension switched to the counterpart format.
pub fn derive_target(source: &Path, suffix: &str) -> Option<PathBuf> {
    let extension = source.extension()?.to_str()?;
    let target_ext = match extension {
        "yw7" => "novx",
        "novx" => "yw7",
        "pwc" => "nvcx",
        _ => return None,
    };
    let stem = source.file_stem()?.to_str()?;
    let parent = source.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = format!("{stem}{suffix}.{target_ext}");
    Some(match parent {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    })
}
