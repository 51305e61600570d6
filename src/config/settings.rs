//! Configuration settings for localcert.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default certificate output file.
pub const DEFAULT_CERT_FILE: &str = "cert.pem";
/// Default private key output file.
pub const DEFAULT_KEY_FILE: &str = "key.pem";
/// Default newline-delimited domains file.
pub const DEFAULT_DOMAINS_FILE: &str = ".domains";
/// Default certificate tool binary, looked up on `PATH`.
pub const DEFAULT_MKCERT_BINARY: &str = "mkcert";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub certs: CertsConfig,
    pub mkcert: MkcertConfig,
    pub cleanup: CleanupConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("localcert.toml"),
            dirs::config_dir()
                .map(|p| p.join("localcert/config.toml"))
                .unwrap_or_default(),
        ];

        for path in config_paths.iter().filter(|p| !p.as_os_str().is_empty()) {
            if path.exists() {
                tracing::debug!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.certs.cert_file.trim().is_empty() {
            return Err(ConfigError::Invalid("certs.cert_file must not be empty".to_string()).into());
        }
        if self.certs.key_file.trim().is_empty() {
            return Err(ConfigError::Invalid("certs.key_file must not be empty".to_string()).into());
        }
        if self.certs.cert_file == self.certs.key_file {
            return Err(ConfigError::Invalid(format!(
                "certificate and key would both be written to {}",
                self.certs.cert_file
            ))
            .into());
        }
        if self.mkcert.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("mkcert.binary must not be empty".to_string()).into());
        }
        Ok(())
    }

    /// Certificate output path, tilde-expanded.
    pub fn cert_path(&self) -> PathBuf {
        expand(&self.certs.cert_file)
    }

    /// Key output path, tilde-expanded.
    pub fn key_path(&self) -> PathBuf {
        expand(&self.certs.key_file)
    }

    /// Domains file path, tilde-expanded.
    pub fn domains_path(&self) -> PathBuf {
        expand(&self.certs.domains_file)
    }

    /// Certificate tool binary, tilde-expanded.
    pub fn mkcert_binary(&self) -> PathBuf {
        expand(&self.mkcert.binary)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Output locations and domain source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CertsConfig {
    /// Where the generated certificate is written
    pub cert_file: String,
    /// Where the generated private key is written
    pub key_file: String,
    /// Newline-delimited domain list
    pub domains_file: String,
}

impl Default for CertsConfig {
    fn default() -> Self {
        Self {
            cert_file: DEFAULT_CERT_FILE.to_string(),
            key_file: DEFAULT_KEY_FILE.to_string(),
            domains_file: DEFAULT_DOMAINS_FILE.to_string(),
        }
    }
}

/// External certificate tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MkcertConfig {
    /// Binary name or path
    pub binary: String,
}

impl Default for MkcertConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_MKCERT_BINARY.to_string(),
        }
    }
}

/// Stale artifact cleanup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// File name globs matched against the working directory
    pub patterns: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            patterns: crate::cleanup::DEFAULT_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Immutable settings for a single run, after command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub domains_file: PathBuf,
    /// Comma-separated explicit domains; empty when not given
    pub explicit_domains: String,
    /// Skip the deletion confirmation
    pub force: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Settings {
    /// Settings taken from the configuration file alone.
    pub fn from_config(config: &Config) -> Self {
        Self {
            cert_file: config.cert_path(),
            key_file: config.key_path(),
            domains_file: config.domains_path(),
            explicit_domains: String::new(),
            force: false,
        }
    }

    /// Reject settings that would make the tool overwrite its own output.
    pub fn validate(&self) -> Result<()> {
        if self.cert_file == self.key_file {
            return Err(ConfigError::Invalid(format!(
                "certificate and key would both be written to {}",
                self.cert_file.display()
            ))
            .into());
        }
        Ok(())
    }
}
