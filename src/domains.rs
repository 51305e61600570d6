//! Domain list resolution.
//!
//! The effective list comes from the first non-empty source among an
//! explicit comma-separated argument, a newline-delimited domains file, and
//! the built-in localhost defaults. Resolution never fails: problems with
//! the file degrade to the defaults and are reported as a [`DomainWarning`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Subject names used when no other source yields any entry.
pub const DEFAULT_DOMAINS: [&str; 4] = ["*.localhost", "localhost", "127.0.0.1", "::1"];

/// Ordered, non-empty list of domain names and IP literals.
///
/// Entries are trimmed. Duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainList(Vec<String>);

impl DomainList {
    /// Build a list from already-trimmed entries. Returns `None` if empty.
    fn from_entries(entries: Vec<String>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self(entries))
        }
    }

    /// The built-in localhost list.
    pub fn defaults() -> Self {
        Self(DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a resolved list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for DomainList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<'a> IntoIterator for &'a DomainList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where a resolved list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainSource {
    /// The `--domains` argument
    Explicit,
    /// A domains file
    File(PathBuf),
    /// The built-in defaults
    Default,
}

impl fmt::Display for DomainSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainSource::Explicit => f.write_str("command line"),
            DomainSource::File(path) => write!(f, "{}", path.display()),
            DomainSource::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Non-fatal problem with the domains file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainWarning {
    MissingFile(PathBuf),
    EmptyFile(PathBuf),
    UnreadableFile(PathBuf, String),
}

impl fmt::Display for DomainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainWarning::MissingFile(path) => {
                write!(f, "{} not found, using default domains", path.display())
            }
            DomainWarning::EmptyFile(path) => write!(
                f,
                "{} contains no domains, using default domains",
                path.display()
            ),
            DomainWarning::UnreadableFile(path, reason) => write!(
                f,
                "could not read {} ({}), using default domains",
                path.display(),
                reason
            ),
        }
    }
}

/// Outcome of domain resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub domains: DomainList,
    pub source: DomainSource,
    pub warning: Option<DomainWarning>,
}

/// Resolve the effective domain list.
///
/// A non-empty `explicit_csv` wins outright and the file is not read.
pub fn resolve(explicit_csv: &str, domains_file: &Path) -> Resolution {
    if let Some(domains) = DomainList::from_entries(parse_csv(explicit_csv)) {
        return Resolution {
            domains,
            source: DomainSource::Explicit,
            warning: None,
        };
    }

    let warning = match std::fs::read_to_string(domains_file) {
        Ok(content) => match DomainList::from_entries(parse_lines(&content)) {
            Some(domains) => {
                return Resolution {
                    domains,
                    source: DomainSource::File(domains_file.to_path_buf()),
                    warning: None,
                }
            }
            None => DomainWarning::EmptyFile(domains_file.to_path_buf()),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            DomainWarning::MissingFile(domains_file.to_path_buf())
        }
        Err(e) => DomainWarning::UnreadableFile(domains_file.to_path_buf(), e.to_string()),
    };

    Resolution {
        domains: DomainList::defaults(),
        source: DomainSource::Default,
        warning: Some(warning),
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse domains file content: one entry per line, `#` comments and blank
/// lines skipped.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
