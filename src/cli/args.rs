//! Command-line arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::config::{Config, Settings};
use crate::error::Result;

/// localcert: locally trusted development certificates via mkcert
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "localcert")]
#[command(version, about, long_about = None)]
#[command(args_override_self = true)]
pub struct Args {
    /// Skip confirmation before deleting old certificate files
    #[arg(short, long)]
    pub force: bool,

    /// Output path for the certificate [default: cert.pem]
    #[arg(long, value_name = "PATH")]
    pub cert_file: Option<PathBuf>,

    /// Output path for the private key [default: key.pem]
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Comma-separated domains; takes precedence over the domains file
    #[arg(long, value_name = "CSV")]
    pub domains: Option<String>,

    /// Newline-delimited domains file [default: .domains]
    #[arg(long = "file", value_name = "PATH")]
    pub domains_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// mkcert binary to run [default: mkcert]
    #[arg(long, value_name = "PATH", env = "MKCERT_BIN")]
    pub mkcert: Option<PathBuf>,
}

impl Args {
    /// Parse the process arguments, dropping any that are not recognized.
    pub fn parse_lenient() -> Self {
        Self::parse_from(retain_known_args(std::env::args_os()))
    }

    /// Settings for this run: command-line values over `config`.
    pub fn settings(&self, config: &Config) -> Result<Settings> {
        let mut settings = Settings::from_config(config);
        if let Some(cert_file) = &self.cert_file {
            settings.cert_file = cert_file.clone();
        }
        if let Some(key_file) = &self.key_file {
            settings.key_file = key_file.clone();
        }
        if let Some(domains_file) = &self.domains_file {
            settings.domains_file = domains_file.clone();
        }
        if let Some(domains) = &self.domains {
            settings.explicit_domains = domains.clone();
        }
        settings.force = self.force;
        settings.validate()?;
        Ok(settings)
    }

    /// The mkcert binary: command line or environment, then config.
    pub fn mkcert_binary(&self, config: &Config) -> PathBuf {
        self.mkcert
            .clone()
            .unwrap_or_else(|| config.mkcert_binary())
    }
}

/// Filter `args` down to the flags [`Args`] declares, keeping each flag's
/// value. The first element is the program name and is always kept.
///
/// Anything else, including positional words and unknown flags, is dropped.
pub fn retain_known_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = Args::command();
    cmd.build();

    let mut longs: Vec<(String, bool)> = Vec::new();
    let mut shorts: Vec<(char, bool)> = Vec::new();
    for arg in cmd.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            longs.push((long.to_string(), takes_value));
        }
        if let Some(short) = arg.get_short() {
            shorts.push((short, takes_value));
        }
    }
    let long = |name: &str| longs.iter().find(|(l, _)| l == name).map(|(_, v)| *v);
    let short = |c: char| shorts.iter().find(|(s, _)| *s == c).map(|(_, v)| *v);

    let mut iter = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let text = arg.to_string_lossy().into_owned();

        if let Some(rest) = text.strip_prefix("--") {
            let (name, inline_value) = match rest.split_once('=') {
                Some((name, _)) => (name, true),
                None => (rest, false),
            };
            match long(name) {
                Some(takes_value) => {
                    kept.push(arg);
                    if takes_value && !inline_value {
                        kept.extend(iter.next());
                    }
                }
                None => tracing::debug!("Ignoring unrecognized argument {:?}", text),
            }
        } else if let Some(cluster) = text.strip_prefix('-').filter(|c| !c.is_empty()) {
            match short_cluster(cluster, &short) {
                Some(needs_next) => {
                    kept.push(arg);
                    if needs_next {
                        kept.extend(iter.next());
                    }
                }
                None => tracing::debug!("Ignoring unrecognized argument {:?}", text),
            }
        } else {
            tracing::debug!("Ignoring unrecognized argument {:?}", text);
        }
    }

    kept
}

/// Check a cluster of short flags such as `-fh` or `-cpath`.
///
/// Returns `None` if any flag is unknown, otherwise whether the following
/// argument is the value of the last flag.
fn short_cluster(cluster: &str, short: &impl Fn(char) -> Option<bool>) -> Option<bool> {
    let mut chars = cluster.chars();
    while let Some(c) = chars.next() {
        if short(c)? {
            return Some(chars.as_str().is_empty());
        }
    }
    Some(false)
}
