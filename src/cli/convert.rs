//! Conversion orchestration: extension dispatch and status output.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::args::derive_target;
use crate::collection::upgrade_collection;
use crate::utils::progress::{create_spinner, finish_with_success};
use crate::utils::styling::{print_conversion, print_success};
use crate::{novx, yw7};

/// Runs one conversion, selected by the source file's extension.
/// Returns the path of the created file.
pub fn run_convert(source: &Path, suffix: &str, quiet: bool) -> Result<PathBuf> {
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_string();
    let target = derive_target(source, suffix).ok_or_else(|| {
        anyhow::anyhow!("file type \"{extension}\" is not supported (expected .yw7, .novx, or .pwc)")
    })?;
    if !source.is_file() {
        bail!("file not found: \"{}\"", source.display());
    }
    if !quiet {
        print_conversion(source, &target);
    }

    match extension.as_str() {
        "yw7" => {
            let mut project = step(quiet, "Reading yw7 project...", "yw7 project read", || {
                yw7::read_project(source)
                    .with_context(|| format!("cannot read \"{}\"", source.display()))
            })?;
            step(quiet, "Writing novx project...", "novx project written", || {
                novx::write_project(&target, &mut project)
                    .with_context(|| format!("cannot write \"{}\"", target.display()))
            })?;
        }
        "novx" => {
            let mut project = step(quiet, "Reading novx project...", "novx project read", || {
                novx::read_project(source)
                    .with_context(|| format!("cannot read \"{}\"", source.display()))
            })?;
            step(quiet, "Writing yw7 project...", "yw7 project written", || {
                yw7::write_project(&target, &mut project)
                    .with_context(|| format!("cannot write \"{}\"", target.display()))
            })?;
        }
        "pwc" => {
            step(quiet, "Upgrading collection...", "collection upgraded", || {
                upgrade_collection(source, &target)
                    .with_context(|| format!("cannot upgrade \"{}\"", source.display()))
            })?;
        }
        _ => unreachable!("derive_target rejects unsupported extensions"),
    }

    if !quiet {
        print_success(&format!("Created \"{}\"", target.display()));
    }
    Ok(target)
}

/// Runs one conversion step behind a spinner unless quiet.
fn step<T>(
    quiet: bool,
    message: &str,
    done: &str,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if quiet {
        return f();
    }
    let spinner = create_spinner(message);
    let result = f();
    match &result {
        Ok(_) => finish_with_success(&spinner, done),
        Err(_) => spinner.finish_and_clear(),
    }
    result
}
