//! Configuration file and per-run settings.

mod settings;

pub use settings::*;
