//! Output formatting for CLI progress.
//!
//! Everything the operator sees is plain text on stdout.

use std::io::{self, Write};

use crate::orchestrator::Progress;
use crate::tls::TrustResult;

/// Print a progress event to stdout.
pub fn print_progress(event: &Progress) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Broken pipes on stdout must not abort the run
    let _ = write_progress(&mut out, event);
}

/// Format a progress event.
pub fn write_progress<W: Write>(out: &mut W, event: &Progress) -> io::Result<()> {
    match event {
        Progress::DomainWarning(warning) => writeln!(out, "Warning: {}", warning),
        Progress::DomainsResolved { domains, source } => {
            writeln!(out, "Using domains from {}: {}", source, domains)
        }
        Progress::CaRoot(root) => writeln!(out, "CA root: {}", root.display()),
        Progress::NothingToClean => writeln!(out, "No existing certificate files to clean up"),
        Progress::ArtifactsFound(files) => {
            writeln!(out, "Found existing certificate files:")?;
            for file in files {
                writeln!(out, "  - {}", file.display())?;
            }
            Ok(())
        }
        Progress::ArtifactsRemoved { removed, failed } => {
            if *failed == 0 {
                writeln!(out, "Removed {} file(s)", removed)
            } else {
                writeln!(
                    out,
                    "Removed {} file(s), {} could not be removed",
                    removed, failed
                )
            }
        }
        Progress::CleanupSkipped(_) => writeln!(
            out,
            "Warning: keeping existing certificate files, they may conflict with the new certificate"
        ),
        Progress::Generating { domains, .. } => {
            writeln!(out, "Generating certificate for: {}", domains)
        }
        Progress::InstallingTrust => writeln!(out, "Reinstalling the local root CA"),
        Progress::TrustInstalled(result) => match result {
            TrustResult::Reinstalled => writeln!(out, "Root CA reinstalled"),
            TrustResult::Installed { .. } => {
                writeln!(out, "Root CA installed (no previous CA was removed)")
            }
        },
        Progress::Complete {
            cert_file,
            key_file,
        } => {
            writeln!(out, "Done.")?;
            writeln!(out, "  Certificate: {}", cert_file.display())?;
            writeln!(out, "  Key:         {}", key_file.display())
        }
    }
}
