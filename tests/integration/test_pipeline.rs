//! End-to-end pipeline tests with a fake certificate tool.

use std::cell::RefCell;

use tempfile::TempDir;

use localcert::{CleanupOutcome, Orchestrator, Progress, Settings, TrustResult};

use crate::common::{touch, FakeTool, ScriptedConfirm};

fn settings(force: bool) -> Settings {
    Settings {
        explicit_domains: "api.localhost,web.localhost".to_string(),
        force,
        ..Settings::default()
    }
}

#[test]
fn test_force_deletes_without_asking() {
    let dir = TempDir::new().unwrap();
    let cert = touch(dir.path(), "cert.pem");
    let wildcard = touch(dir.path(), "_wildcard.localhost.pem");
    let unrelated = touch(dir.path(), "notes.txt");

    let tool = FakeTool::default();
    let mut confirm = ScriptedConfirm::default();
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .confirm(&mut confirm)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let summary = orchestrator.run(&settings(true)).unwrap();
    drop(orchestrator);

    assert_eq!(confirm.asked, 0);
    match summary.cleanup {
        CleanupOutcome::Removed(removal) => {
            assert_eq!(removal.removed.len(), 2);
            assert!(removal.failed.is_empty());
        }
        other => panic!("expected removal, got {:?}", other),
    }
    assert!(!cert.exists());
    assert!(!wildcard.exists());
    assert!(unrelated.exists());
    assert_eq!(
        tool.calls(),
        vec![
            "generate cert.pem key.pem api.localhost web.localhost",
            "uninstall",
            "install"
        ]
    );
}

#[test]
fn test_confirmed_deletion() {
    let dir = TempDir::new().unwrap();
    let cert = touch(dir.path(), "cert.pem");

    let tool = FakeTool::default();
    let mut confirm = ScriptedConfirm::answering(&[true]);
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .confirm(&mut confirm)
        .work_dir(dir.path())
        .build()
        .unwrap();

    orchestrator.run(&settings(false)).unwrap();
    drop(orchestrator);

    assert_eq!(confirm.asked, 1);
    assert!(!cert.exists());
}

#[test]
fn test_declined_deletion_keeps_files_and_generates() {
    let dir = TempDir::new().unwrap();
    let cert = touch(dir.path(), "cert.pem");
    let key = touch(dir.path(), "key.pem");

    let tool = FakeTool::default();
    let mut confirm = ScriptedConfirm::answering(&[false]);
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .confirm(&mut confirm)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let summary = orchestrator.run(&settings(false)).unwrap();
    drop(orchestrator);

    assert_eq!(confirm.asked, 1);
    match summary.cleanup {
        CleanupOutcome::Skipped(kept) => assert_eq!(kept.len(), 2),
        other => panic!("expected skipped cleanup, got {:?}", other),
    }
    assert!(cert.exists());
    assert!(key.exists());
    assert_eq!(tool.calls().len(), 3);
}

#[test]
fn test_nothing_to_clean_never_asks() {
    let dir = TempDir::new().unwrap();

    let tool = FakeTool::default();
    let mut confirm = ScriptedConfirm::default();
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .confirm(&mut confirm)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let summary = orchestrator.run(&settings(false)).unwrap();
    drop(orchestrator);

    assert_eq!(confirm.asked, 0);
    assert!(matches!(summary.cleanup, CleanupOutcome::NothingToClean));
}

#[test]
fn test_failed_generation_stops_before_trust_steps() {
    let dir = TempDir::new().unwrap();
    let tool = FakeTool {
        fail_generate: Some(4),
        ..Default::default()
    };
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let err = orchestrator.run(&settings(true)).unwrap_err();
    drop(orchestrator);

    assert_eq!(err.exit_code(), 4);
    assert_eq!(
        tool.calls(),
        vec!["generate cert.pem key.pem api.localhost web.localhost"]
    );
}

#[test]
fn test_failed_uninstall_still_installs() {
    let dir = TempDir::new().unwrap();
    let tool = FakeTool {
        fail_uninstall: Some(1),
        ..Default::default()
    };
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let summary = orchestrator.run(&settings(true)).unwrap();
    drop(orchestrator);

    assert!(matches!(summary.trust, TrustResult::Installed { .. }));
    assert_eq!(tool.calls()[1..], ["uninstall", "install"]);
}

#[test]
fn test_failed_install_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tool = FakeTool {
        fail_install: Some(5),
        ..Default::default()
    };
    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .work_dir(dir.path())
        .build()
        .unwrap();

    let err = orchestrator.run(&settings(true)).unwrap_err();
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_progress_sequence() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "localhost.pem");
    let events = RefCell::new(Vec::new());
    let tool = FakeTool::default();

    let mut orchestrator = Orchestrator::builder()
        .tool(&tool)
        .work_dir(dir.path())
        .on_progress(|event: &Progress| events.borrow_mut().push(event.clone()))
        .build()
        .unwrap();
    orchestrator
        .run(&Settings {
            force: true,
            ..Settings::default()
        })
        .unwrap();
    drop(orchestrator);

    let kinds: Vec<&'static str> = events
        .borrow()
        .iter()
        .map(|event| match event {
            Progress::DomainWarning(_) => "warning",
            Progress::DomainsResolved { .. } => "domains",
            Progress::CaRoot(_) => "ca-root",
            Progress::NothingToClean => "nothing-to-clean",
            Progress::ArtifactsFound(_) => "found",
            Progress::ArtifactsRemoved { .. } => "removed",
            Progress::CleanupSkipped(_) => "skipped",
            Progress::Generating { .. } => "generating",
            Progress::InstallingTrust => "installing",
            Progress::TrustInstalled(_) => "installed",
            Progress::Complete { .. } => "complete",
        })
        .collect();

    // No .domains in the directory, so the defaults are used with a warning
    assert_eq!(
        kinds,
        vec![
            "warning",
            "domains",
            "ca-root",
            "found",
            "removed",
            "generating",
            "installing",
            "installed",
            "complete"
        ]
    );
}
