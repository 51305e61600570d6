//! CLI module for the localcert command-line interface.

mod args;
mod commands;
pub mod output;

pub use args::{retain_known_args, Args};
pub use commands::*;
