//! localcert: locally trusted development certificates
//!
//! Resolves a domain list, clears out stale certificate files, and drives
//! mkcert to issue a certificate and reinstall its root CA.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod domains;
pub mod error;
pub mod orchestrator;
pub mod tls;

pub use cleanup::{AlwaysConfirm, ArtifactPatterns, CleanupOutcome, Confirm, LineConfirm};
pub use config::{Config, Settings};
pub use domains::{DomainList, DomainSource, DomainWarning, Resolution};
pub use error::{CertError, ConfigError, Result, ToolStep};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, Progress, RunSummary};
pub use tls::{CertTool, Mkcert, TrustResult, TrustStore};
