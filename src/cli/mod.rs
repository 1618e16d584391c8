//! CLI module - argument parsing and conversion orchestration

mod args;
pub mod convert;

pub use args::{derive_target, Cli};
pub use convert::run_convert;
