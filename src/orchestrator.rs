//! Orchestrator that runs the certificate provisioning pipeline.
//!
//! The pipeline is strictly linear:
//! - Domain list resolution
//! - CA root lookup (informational)
//! - Stale artifact cleanup, gated by a confirmation provider
//! - Certificate generation
//! - Trust anchor reinstall
//!
//! Progress is reported through a callback. Only generation and install
//! failures stop the run; nothing is rolled back.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::cleanup::{
    find_artifacts, remove_artifacts, AlwaysConfirm, ArtifactPatterns, CleanupOutcome, Confirm,
    DEFAULT_PATTERNS,
};
use crate::config::Settings;
use crate::domains::{self, DomainList, DomainSource, DomainWarning, Resolution};
use crate::error::Result;
use crate::tls::{CertTool, TrustResult, TrustStore};

/// Progress event during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The effective domain list is known.
    DomainsResolved {
        domains: DomainList,
        source: DomainSource,
    },
    /// The domains file could not be used.
    DomainWarning(DomainWarning),
    /// The tool reported its CA directory.
    CaRoot(PathBuf),
    /// No stale artifacts were found.
    NothingToClean,
    /// Stale artifacts were found and are about to be confirmed.
    ArtifactsFound(Vec<PathBuf>),
    /// Stale artifacts were deleted.
    ArtifactsRemoved { removed: usize, failed: usize },
    /// The operator declined the deletion.
    CleanupSkipped(Vec<PathBuf>),
    /// Certificate generation is starting.
    Generating {
        cert_file: PathBuf,
        key_file: PathBuf,
        domains: DomainList,
    },
    /// Trust anchor reinstall is starting.
    InstallingTrust,
    /// Trust anchor is installed.
    TrustInstalled(TrustResult),
    /// The run finished successfully.
    Complete { cert_file: PathBuf, key_file: PathBuf },
}

/// What a successful run did.
#[derive(Debug)]
pub struct RunSummary {
    pub resolution: Resolution,
    pub ca_root: Option<PathBuf>,
    pub cleanup: CleanupOutcome,
    pub trust: TrustResult,
}

/// Runs the pipeline against one working directory.
pub struct Orchestrator<'a> {
    tool: Box<dyn CertTool + 'a>,
    confirm: Box<dyn Confirm + 'a>,
    patterns: Vec<String>,
    work_dir: PathBuf,
    on_progress: Box<dyn FnMut(&Progress) + 'a>,
}

impl<'a> Orchestrator<'a> {
    /// Create a builder.
    pub fn builder() -> OrchestratorBuilder<'a> {
        OrchestratorBuilder::new()
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn emit(&mut self, event: Progress) {
        (self.on_progress)(&event);
    }

    /// Execute the full pipeline.
    pub fn run(&mut self, settings: &Settings) -> Result<RunSummary> {
        let resolution = self.resolve_domains(settings);
        let ca_root = self.ca_root();
        let cleanup = self.cleanup(settings);

        self.emit(Progress::Generating {
            cert_file: settings.cert_file.clone(),
            key_file: settings.key_file.clone(),
            domains: resolution.domains.clone(),
        });
        self.tool
            .generate(&settings.cert_file, &settings.key_file, &resolution.domains)?;
        info!(
            cert = %settings.cert_file.display(),
            key = %settings.key_file.display(),
            "Certificate generated"
        );

        self.emit(Progress::InstallingTrust);
        let trust = TrustStore::new(&*self.tool).reinstall()?;
        self.emit(Progress::TrustInstalled(trust.clone()));

        self.emit(Progress::Complete {
            cert_file: settings.cert_file.clone(),
            key_file: settings.key_file.clone(),
        });

        Ok(RunSummary {
            resolution,
            ca_root,
            cleanup,
            trust,
        })
    }

    fn resolve_domains(&mut self, settings: &Settings) -> Resolution {
        let domains_file = self.work_dir.join(&settings.domains_file);
        let resolution = domains::resolve(&settings.explicit_domains, &domains_file);

        if let Some(warning) = &resolution.warning {
            debug!("{}", warning);
            self.emit(Progress::DomainWarning(warning.clone()));
        }
        debug!(source = %resolution.source, domains = %resolution.domains, "Domains resolved");
        self.emit(Progress::DomainsResolved {
            domains: resolution.domains.clone(),
            source: resolution.source.clone(),
        });
        resolution
    }

    fn ca_root(&mut self) -> Option<PathBuf> {
        match self.tool.ca_root() {
            Ok(root) => {
                self.emit(Progress::CaRoot(root.clone()));
                Some(root)
            }
            Err(e) => {
                warn!("Could not query CA root: {}", e);
                None
            }
        }
    }

    fn cleanup(&mut self, settings: &Settings) -> CleanupOutcome {
        let patterns = ArtifactPatterns::new(
            &[settings.cert_file.as_path(), settings.key_file.as_path()],
            self.patterns.as_slice(),
        );
        let found = match find_artifacts(&self.work_dir, &patterns) {
            Ok(found) => found,
            Err(e) => {
                warn!("Could not scan {}: {}", self.work_dir.display(), e);
                BTreeSet::new()
            }
        };

        if found.is_empty() {
            self.emit(Progress::NothingToClean);
            return CleanupOutcome::NothingToClean;
        }

        self.emit(Progress::ArtifactsFound(found.iter().cloned().collect()));

        let mut always = AlwaysConfirm;
        let confirm: &mut (dyn Confirm + 'a) = if settings.force {
            &mut always
        } else {
            self.confirm.as_mut()
        };

        if confirm.confirm("Delete these files?") {
            let removal = remove_artifacts(&found);
            self.emit(Progress::ArtifactsRemoved {
                removed: removal.removed.len(),
                failed: removal.failed.len(),
            });
            CleanupOutcome::Removed(removal)
        } else {
            debug!(kept = found.len(), "Stale certificate files were kept");
            self.emit(Progress::CleanupSkipped(found.iter().cloned().collect()));
            CleanupOutcome::Skipped(found)
        }
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder<'a> {
    tool: Option<Box<dyn CertTool + 'a>>,
    confirm: Option<Box<dyn Confirm + 'a>>,
    patterns: Vec<String>,
    work_dir: Option<PathBuf>,
    on_progress: Option<Box<dyn FnMut(&Progress) + 'a>>,
}

impl<'a> Default for OrchestratorBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OrchestratorBuilder<'a> {
    pub fn new() -> Self {
        Self {
            tool: None,
            confirm: None,
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            work_dir: None,
            on_progress: None,
        }
    }

    /// The certificate tool to drive. Required.
    pub fn tool(mut self, tool: impl CertTool + 'a) -> Self {
        self.tool = Some(Box::new(tool));
        self
    }

    /// Confirmation provider for deletions. Defaults to declining.
    pub fn confirm(mut self, confirm: impl Confirm + 'a) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    /// Cleanup globs. Defaults to [`DEFAULT_PATTERNS`].
    pub fn patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Directory scanned for stale artifacts and used to resolve the
    /// domains file. Defaults to the current directory.
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn on_progress(mut self, f: impl FnMut(&Progress) + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<Orchestrator<'a>> {
        let tool = self.tool.ok_or_else(|| {
            crate::error::ConfigError::Invalid("no certificate tool configured".to_string())
        })?;
        let work_dir = match self.work_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(Orchestrator {
            tool,
            confirm: self.confirm.unwrap_or_else(|| Box::new(Decline)),
            patterns: self.patterns,
            work_dir,
            on_progress: self.on_progress.unwrap_or_else(|| Box::new(|_: &Progress| {})),
        })
    }
}

struct Decline;

impl Confirm for Decline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
