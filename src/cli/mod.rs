//! Command-line interface module.

mod args;
pub mod generate;

pub use args::Cli;
