//! Error types for localcert.

use std::fmt;

use thiserror::Error;

/// Pipeline step that shells out to the certificate tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStep {
    CaRoot,
    Generate,
    Uninstall,
    Install,
}

impl fmt::Display for ToolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolStep::CaRoot => "CA root query",
            ToolStep::Generate => "certificate generation",
            ToolStep::Uninstall => "trust anchor uninstall",
            ToolStep::Install => "trust anchor install",
        };
        f.write_str(name)
    }
}

/// Main error type for localcert operations.
#[derive(Error, Debug)]
pub enum CertError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tool ran but reported failure. `code` is `None` when it was
    /// terminated by a signal.
    #[error("{step} failed (exit status: {})", display_code(.code))]
    ToolFailed { step: ToolStep, code: Option<i32> },

    #[error("Failed to run {program} for {step}: {source}")]
    Spawn {
        step: ToolStep,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CertError {
    /// Process exit code to surface for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CertError::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for localcert operations.
pub type Result<T> = std::result::Result<T, CertError>;
