//! The external certificate tool.
//!
//! Every call is synchronous, runs to completion, and has no timeout.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::domains::DomainList;
use crate::error::{CertError, Result, ToolStep};

/// Operations the orchestrator needs from a certificate tool.
pub trait CertTool {
    /// Directory holding the tool's root CA.
    fn ca_root(&self) -> Result<PathBuf>;

    /// Issue a certificate for `domains`, writing `cert_file` and `key_file`.
    fn generate(&self, cert_file: &Path, key_file: &Path, domains: &DomainList) -> Result<()>;

    /// Remove the root CA from the trust stores.
    fn uninstall(&self) -> Result<()>;

    /// Install the root CA into the trust stores.
    fn install(&self) -> Result<()>;
}

impl<T: CertTool + ?Sized> CertTool for &T {
    fn ca_root(&self) -> Result<PathBuf> {
        (**self).ca_root()
    }

    fn generate(&self, cert_file: &Path, key_file: &Path, domains: &DomainList) -> Result<()> {
        (**self).generate(cert_file, key_file, domains)
    }

    fn uninstall(&self) -> Result<()> {
        (**self).uninstall()
    }

    fn install(&self) -> Result<()> {
        (**self).install()
    }
}

/// Runs the `mkcert` binary.
#[derive(Debug, Clone)]
pub struct Mkcert {
    binary: PathBuf,
    work_dir: PathBuf,
}

impl Mkcert {
    /// Use `binary` with relative output paths resolved against `work_dir`.
    pub fn new(binary: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(&self.work_dir);
        cmd
    }

    fn spawn_error(&self, step: ToolStep, source: std::io::Error) -> CertError {
        CertError::Spawn {
            step,
            program: self.binary.display().to_string(),
            source,
        }
    }

    /// Run with inherited stdio so the tool's own output reaches the operator.
    fn run(&self, step: ToolStep, mut cmd: Command) -> Result<()> {
        debug!(?step, command = ?cmd, "Running certificate tool");
        let status = cmd.status().map_err(|e| self.spawn_error(step, e))?;
        check(step, status)
    }
}

fn check(step: ToolStep, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(CertError::ToolFailed {
            step,
            code: status.code(),
        })
    }
}

impl CertTool for Mkcert {
    fn ca_root(&self) -> Result<PathBuf> {
        let step = ToolStep::CaRoot;
        let output = self
            .command()
            .arg("-CAROOT")
            .output()
            .map_err(|e| self.spawn_error(step, e))?;
        check(step, output.status)?;

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }

    fn generate(&self, cert_file: &Path, key_file: &Path, domains: &DomainList) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("-cert-file")
            .arg(cert_file)
            .arg("-key-file")
            .arg(key_file)
            .args(domains.iter());
        self.run(ToolStep::Generate, cmd)
    }

    fn uninstall(&self) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("-uninstall");
        self.run(ToolStep::Uninstall, cmd)
    }

    fn install(&self) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("-install");
        self.run(ToolStep::Install, cmd)
    }
}
