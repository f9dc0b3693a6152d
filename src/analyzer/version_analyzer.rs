use crate::domain::{ClassifiedCommit, VersionBump, VersionTag};
use crate::error::Result;
use crate::git::{CommitRecord, Repository};
use std::collections::BTreeMap;

/// Commit types that warrant a minor bump
const MINOR_TYPES: &[&str] = &["feat", "perf"];

/// Aggregate view of a list of commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Always Major, Minor or Patch
    pub recommended_bump: VersionBump,
    /// Count per conventional type; unrecognised commits are not counted
    pub type_counts: BTreeMap<String, usize>,
    pub breaking_count: usize,
    pub total_commits: usize,
}

/// Classify every message and recommend a bump
///
/// Priority is major > minor > patch: any breaking commit means major, any
/// feat/perf means minor, everything else (including an empty list) is patch.
pub fn analyze_commits<S: AsRef<str>>(messages: &[S]) -> AnalysisResult {
    let mut type_counts = BTreeMap::new();
    let mut breaking_count = 0;
    let mut has_minor = false;

    for message in messages {
        let parsed = ClassifiedCommit::parse(message.as_ref());

        if parsed.is_conventional() {
            *type_counts.entry(parsed.r#type.clone()).or_insert(0) += 1;
        }

        if parsed.is_breaking_change {
            breaking_count += 1;
        }

        if MINOR_TYPES.contains(&parsed.r#type.as_str()) {
            has_minor = true;
        }
    }

    let recommended_bump = if breaking_count > 0 {
        VersionBump::Major
    } else if has_minor {
        VersionBump::Minor
    } else {
        VersionBump::Patch
    };

    AnalysisResult {
        recommended_bump,
        type_counts,
        breaking_count,
        total_commits: messages.len(),
    }
}

/// Commits made since the latest `prefix` tag (every commit if there is none)
///
/// Returns the tag that bounded the walk alongside the commits, newest first.
pub fn commits_since_latest<R: Repository + ?Sized>(
    repo: &R,
    prefix: &str,
) -> Result<(Option<VersionTag>, Vec<CommitRecord>)> {
    let latest = repo.latest_tag(prefix)?;
    let commits = match &latest {
        Some(found) => repo.commits_since(&found.tag.name)?,
        None => repo.all_commits()?,
    };
    Ok((latest, commits))
}

/// Analyze the commits a release from `prefix` tags would contain
pub fn analyze_repository<R: Repository + ?Sized>(repo: &R, prefix: &str) -> Result<AnalysisResult> {
    let (_, commits) = commits_since_latest(repo, prefix)?;
    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    Ok(analyze_commits(&messages))
}
