//! CLI command runner.
//!
//! Wires configuration, the mkcert binary, terminal confirmation and
//! stdout progress into an orchestrator run.

use anyhow::{Context, Result};

use super::{output, Args};
use crate::cleanup::LineConfirm;
use crate::config::Config;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::tls::Mkcert;

/// Load the configuration named on the command line, or the default one.
pub fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Provision certificates in the current directory.
pub fn run(args: &Args) -> Result<RunSummary> {
    let config = load_config(args)?;
    let settings = args.settings(&config)?;
    let work_dir = std::env::current_dir().context("Failed to determine working directory")?;
    let tool = Mkcert::new(args.mkcert_binary(&config), &work_dir);

    tracing::debug!(
        mkcert = %tool.binary().display(),
        cert = %settings.cert_file.display(),
        key = %settings.key_file.display(),
        force = settings.force,
        "Configuration loaded"
    );

    let mut orchestrator = Orchestrator::builder()
        .tool(tool)
        .confirm(LineConfirm::stdin())
        .patterns(config.cleanup.patterns.clone())
        .work_dir(work_dir)
        .on_progress(output::print_progress)
        .build()?;

    Ok(orchestrator.run(&settings)?)
}
