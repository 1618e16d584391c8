//! yw-novx: yWriter 7 / novelibre project converter
//!
//! One positional argument selects the source file; the conversion
//! direction follows from its extension (.yw7 -> .novx, .novx -> .yw7,
//! .pwc -> .nvcx).

use clap::Parser;

use yw_novx::cli::{run_convert, Cli};
use yw_novx::utils::styling::{print_error, print_header};

fn main() {
    let cli = Cli::parse();
    if !cli.quiet {
        print_header(env!("CARGO_PKG_VERSION"));
    }
    if let Err(err) = run_convert(&cli.source, &cli.suffix, cli.quiet) {
        print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}
