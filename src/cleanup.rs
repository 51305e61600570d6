//! Discovery and removal of stale certificate artifacts.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

/// File name globs covering the usual mkcert output names.
pub const DEFAULT_PATTERNS: [&str; 3] = ["*.pem", "*localhost*.pem", "_wildcard.*"];

/// The set of names considered certificate artifacts in a directory.
#[derive(Debug, Clone)]
pub struct ArtifactPatterns {
    /// Exact paths (the configured outputs), relative to the scanned directory
    /// unless absolute
    paths: Vec<PathBuf>,
    /// Compiled file name globs
    globs: Vec<Pattern>,
}

impl ArtifactPatterns {
    /// Compile the given globs. Invalid patterns are logged and skipped.
    pub fn new<S: AsRef<str>>(outputs: &[&Path], patterns: &[S]) -> Self {
        let globs = patterns
            .iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid cleanup pattern '{}': {}", p.as_ref(), e);
                    None
                }
            })
            .collect();

        Self {
            paths: outputs.iter().map(|p| p.to_path_buf()).collect(),
            globs,
        }
    }

    /// Default globs plus the given output paths.
    pub fn with_defaults(outputs: &[&Path]) -> Self {
        Self::new(outputs, &DEFAULT_PATTERNS)
    }

    /// Hidden files only match a pattern that starts with a literal dot.
    fn matches_name(&self, name: &str) -> bool {
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        self.globs.iter().any(|g| g.matches_with(name, options))
    }
}

/// Collect every regular file in `dir` (non-recursive) matching `patterns`,
/// plus any configured output that exists.
///
/// The directory is read once and the result is a set, so deletions made
/// afterwards cannot disturb the scan.
pub fn find_artifacts(dir: &Path, patterns: &ArtifactPatterns) -> io::Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        if patterns.matches_name(&name.to_string_lossy()) {
            found.insert(entry.path());
        }
    }

    for output in &patterns.paths {
        let path = if output.is_absolute() {
            output.clone()
        } else {
            dir.join(output)
        };
        if path.is_file() {
            found.insert(path);
        }
    }

    Ok(found)
}

/// Per-file result of a best-effort removal pass.
#[derive(Debug, Default)]
pub struct Removal {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

/// Remove every path, continuing past failures.
pub fn remove_artifacts(paths: &BTreeSet<PathBuf>) -> Removal {
    let mut removal = Removal::default();
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => removal.removed.push(path.clone()),
            Err(e) => {
                debug!("Could not remove {}: {}", path.display(), e);
                removal.failed.push((path.clone(), e));
            }
        }
    }
    removal
}

/// What the cleanup phase did.
#[derive(Debug)]
pub enum CleanupOutcome {
    NothingToClean,
    Removed(Removal),
    /// The operator declined; these files were left in place
    Skipped(BTreeSet<PathBuf>),
}

/// Yes/no confirmation provider.
pub trait Confirm {
    /// Ask `prompt`; true only for an affirmative answer.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Answers yes without asking. Used for force mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Prompts on a writer and reads one line of answer.
///
/// `y` or `Y` is affirmative; anything else, including an empty line, EOF
/// or a read error, is negative.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LineConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Confirmation from the terminal.
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        let _ = write!(self.output, "{} [y/N] ", prompt);
        let _ = self.output.flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => {
                let _ = writeln!(self.output);
                false
            }
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                debug!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
