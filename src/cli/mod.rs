//! Command line interface for the Searchlight toolkit.

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;
