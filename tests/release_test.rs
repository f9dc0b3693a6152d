// tests/release_test.rs
mod common;

use bumpkin::domain::{PreReleaseType, VersionBump};
use bumpkin::git::{Git2Repository, Repository};
use bumpkin::hooks::{CancelToken, HookRunner, OutputMode};
use bumpkin::release::{ReleaseError, ReleaseOrchestrator, ReleasePhase, ReleaseRequest};
use common::TestRepo;

fn runner() -> HookRunner {
    HookRunner::new(OutputMode::Capture { max_lines: 100 })
}

fn open(fixture: &TestRepo) -> Git2Repository {
    Git2Repository::open(fixture.path()).unwrap()
}

#[test]
fn test_first_release_from_empty_tag_list() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: initial feature");
    let repo = open(&fixture);

    let result = ReleaseOrchestrator::new(&repo, runner())
        .execute(&ReleaseRequest::new(VersionBump::Minor), &CancelToken::new())
        .unwrap();

    assert_eq!(result.previous_version, "0.0.0");
    assert_eq!(result.new_version, "0.1.0");
    assert_eq!(result.tag_name, "v0.1.0");
    assert!(result.tag_created);
    assert!(!result.pushed, "no remote configured");
    assert_eq!(fixture.tag_names(), vec!["v0.1.0"]);
}

#[test]
fn test_custom_version_from_existing_tag() {
    let mut fixture = TestRepo::new();
    fixture.commit("chore: init");
    fixture.tag("v1.0.0");
    fixture.commit("fix: something");
    let repo = open(&fixture);

    let request = ReleaseRequest::new(VersionBump::Custom("3.0.0".to_string()));
    let result = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &CancelToken::new())
        .unwrap();

    assert_eq!(result.previous_version, "1.0.0");
    assert_eq!(result.new_version, "3.0.0");
    assert_eq!(repo.latest_tag("v").unwrap().unwrap().tag.name, "v3.0.0");
}

#[test]
fn test_conventional_release_and_prerelease_cycle() {
    let mut fixture = TestRepo::new();
    fixture.commit("chore: init");
    fixture.tag("v1.4.2");
    fixture.commit("fix: a bug");
    fixture.commit("feat(api)!: drop v1 endpoints");
    let repo = open(&fixture);
    let orchestrator = ReleaseOrchestrator::new(&repo, runner());
    let cancel = CancelToken::new();

    let mut request = ReleaseRequest::new(VersionBump::Conventional);
    request.dry_run = true;
    let planned = orchestrator.execute(&request, &cancel).unwrap();
    assert_eq!(planned.new_version, "2.0.0");
    assert!(!planned.tag_created);
    assert_eq!(fixture.tag_names(), vec!["v1.4.2"]);

    let alpha = ReleaseRequest::new(VersionBump::PreRelease(PreReleaseType::Alpha));
    assert_eq!(
        orchestrator.execute(&alpha, &cancel).unwrap().tag_name,
        "v1.4.3-alpha.0"
    );
    fixture.commit("fix: follow-up");
    assert_eq!(
        orchestrator.execute(&alpha, &cancel).unwrap().tag_name,
        "v1.4.3-alpha.1"
    );

    fixture.commit("fix: stabilise");
    let rc = ReleaseRequest::new(VersionBump::PreRelease(PreReleaseType::ReleaseCandidate));
    assert_eq!(
        orchestrator.execute(&rc, &cancel).unwrap().tag_name,
        "v1.4.3-rc.0"
    );

    fixture.commit("docs: release notes");
    let release = ReleaseRequest::new(VersionBump::Release);
    assert_eq!(
        orchestrator.execute(&release, &cancel).unwrap().tag_name,
        "v1.4.3"
    );
}

#[test]
fn test_push_to_remote_and_post_push_warning() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: thing");
    let bare = fixture.add_bare_remote("origin");
    let repo = open(&fixture);

    let mut request = ReleaseRequest::new(VersionBump::Patch);
    request.hooks.post_push = vec!["echo pushed".to_string(), "exit 9".to_string()];

    let result = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &CancelToken::new())
        .unwrap();

    assert!(result.pushed);
    assert_eq!(result.hooks_executed, 2);
    assert_eq!(result.post_push_warnings.len(), 1);
    assert!(result.post_push_warnings[0].contains("exit 9"));

    let remote = git2::Repository::open_bare(bare.path()).unwrap();
    assert!(remote.find_reference("refs/tags/v0.0.1").is_ok());
}

#[test]
fn test_post_tag_failure_keeps_tag() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: thing");
    let repo = open(&fixture);

    let mut request = ReleaseRequest::new(VersionBump::Major);
    request.hooks.post_tag = vec!["exit 1".to_string()];

    let err = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &CancelToken::new())
        .unwrap_err();

    match err {
        ReleaseError::PartialSuccess { phase, result, .. } => {
            assert_eq!(phase, ReleasePhase::PostTagHooks);
            assert!(result.tag_created);
            assert!(!result.pushed);
        }
        other => panic!("expected partial success, got {:?}", other),
    }
    assert_eq!(fixture.tag_names(), vec!["v1.0.0"]);
}

#[test]
fn test_pre_tag_hook_can_veto_release() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: thing");
    let repo = open(&fixture);

    let mut request = ReleaseRequest::new(VersionBump::Patch);
    request.hooks.pre_tag = vec!["test \"$BUMPKIN_VERSION\" = 9.9.9".to_string()];

    let err = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &CancelToken::new())
        .unwrap_err();

    assert!(!err.is_partial_success());
    assert_eq!(err.phase(), ReleasePhase::PreTagHooks);
    assert!(fixture.tag_names().is_empty());
}

#[test]
fn test_existing_tag_is_reported_distinctly() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: thing");
    fixture.tag("v2.0.0");
    let repo = open(&fixture);

    let request = ReleaseRequest::new(VersionBump::Custom("2.0.0".to_string()));
    let err = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &CancelToken::new())
        .unwrap_err();

    assert_eq!(err.phase(), ReleasePhase::Tagging);
    assert!(err.cause().is_tag_exists());
}

#[test]
fn test_cancelled_token_stops_pre_tag_hook() {
    let mut fixture = TestRepo::new();
    fixture.commit("feat: thing");
    let repo = open(&fixture);

    let mut request = ReleaseRequest::new(VersionBump::Patch);
    request.hooks.pre_tag = vec!["exec sleep 5".to_string()];
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = ReleaseOrchestrator::new(&repo, runner())
        .execute(&request, &cancel)
        .unwrap_err();

    assert!(err.to_string().contains("cancelled"));
    assert!(fixture.tag_names().is_empty());
}
