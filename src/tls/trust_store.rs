//! Trust anchor reinstallation.
//!
//! The root CA is removed from the system and browser trust stores and then
//! installed again, so the stores always hold the anchor that signed the
//! freshly generated certificate.

use tracing::info;

use super::mkcert::CertTool;
use crate::error::Result;

/// Result of reinstalling the trust anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustResult {
    /// A previous anchor was removed and the current one installed
    Reinstalled,
    /// Uninstall failed (usually nothing was installed); the anchor was
    /// installed anyway
    Installed { uninstall_error: String },
}

impl TrustResult {
    /// Returns true if a previously installed anchor was removed first.
    pub fn replaced_previous(&self) -> bool {
        matches!(self, TrustResult::Reinstalled)
    }
}

/// Drives trust store operations through a [`CertTool`].
pub struct TrustStore<'a, T: CertTool + ?Sized> {
    tool: &'a T,
}

impl<'a, T: CertTool + ?Sized> TrustStore<'a, T> {
    pub fn new(tool: &'a T) -> Self {
        Self { tool }
    }

    /// Uninstall (best-effort), then install (fatal on failure).
    pub fn reinstall(&self) -> Result<TrustResult> {
        let uninstall_error = match self.tool.uninstall() {
            Ok(()) => None,
            Err(e) => {
                info!("Could not uninstall previous trust anchor: {}", e);
                Some(e.to_string())
            }
        };

        self.tool.install()?;
        info!("Trust anchor installed");

        Ok(match uninstall_error {
            None => TrustResult::Reinstalled,
            Some(uninstall_error) => TrustResult::Installed { uninstall_error },
        })
    }
}
