//! Terminal styling for conversion status output.

use console::{style, Emoji};
use std::path::Path;

pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the tool header line.
pub fn print_header(version: &str) {
    println!();
    println!(
        " {} {}",
        style("yw-novx").cyan().bold(),
        style(format!("v{version}")).dim()
    );
    println!(" {}", style("─".repeat(40)).dim());
}

/// Print the source and target of the running conversion.
pub fn print_conversion(source: &Path, target: &Path) {
    println!("   {}Source: {}", FOLDER, style(source.display()).dim());
    println!("   {}Target: {}", SAVE, style(target.display()).dim());
    println!();
}

pub fn print_success(message: &str) {
    println!("   {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("   {} {}", style("ℹ").cyan(), message);
}

pub fn print_error(message: &str) {
    eprintln!("   {} {}", style("✗").red().bold(), style(message).red());
}
