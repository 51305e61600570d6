//! Certificate generation and trust store installation through mkcert.
//!
//! The cryptography and the trust store manipulation both live in the
//! external tool; this module only decides what to run and how to treat
//! each outcome.

mod mkcert;
mod trust_store;

pub use mkcert::{CertTool, Mkcert};
pub use trust_store::{TrustResult, TrustStore};
