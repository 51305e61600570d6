//! Domain list resolution properties.

use std::path::PathBuf;

use tempfile::TempDir;

use localcert::domains::{self, DEFAULT_DOMAINS};
use localcert::{DomainSource, DomainWarning};

fn domains_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(".domains");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_csv_ignores_file_contents() {
    let dir = TempDir::new().unwrap();
    let csv_inputs = [
        "a.localhost",
        " a.localhost , b.localhost ",
        "a.localhost,,b.localhost,",
        "::1,127.0.0.1, *.localhost",
    ];
    let file_contents = ["", "file.localhost\n", "# only comments\n\n"];

    for csv in csv_inputs {
        let expected = domains::parse_csv(csv);
        for content in file_contents {
            let path = domains_file(&dir, content);
            let resolution = domains::resolve(csv, &path);
            assert_eq!(resolution.source, DomainSource::Explicit);
            assert_eq!(resolution.domains.as_slice(), expected.as_slice());
            assert!(resolution.warning.is_none());
        }
    }
}

#[test]
fn test_comments_and_blanks_only_fall_back() {
    let dir = TempDir::new().unwrap();
    for content in ["", "\n\n", "# a\n   # b\n\t\n", "   \n#localhost\n"] {
        let path = domains_file(&dir, content);
        let resolution = domains::resolve("", &path);
        assert_eq!(resolution.source, DomainSource::Default);
        assert_eq!(resolution.domains.as_slice(), DEFAULT_DOMAINS);
        assert_eq!(resolution.warning, Some(DomainWarning::EmptyFile(path)));
    }
}

#[test]
fn test_file_entries_are_trimmed_in_order() {
    let dir = TempDir::new().unwrap();
    let path = domains_file(&dir, "api.localhost\n  web.localhost  \n# comment\n\n");

    let resolution = domains::resolve("", &path);
    assert_eq!(resolution.source, DomainSource::File(path));
    assert_eq!(resolution.domains.as_slice(), ["api.localhost", "web.localhost"]);
}

#[test]
fn test_missing_file_warns_and_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".domains");

    let resolution = domains::resolve("", &path);
    assert_eq!(resolution.domains.as_slice(), DEFAULT_DOMAINS);
    assert_eq!(resolution.warning, Some(DomainWarning::MissingFile(path)));
}
