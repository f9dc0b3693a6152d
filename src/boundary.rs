use crate::domain::Version;
use crate::error::Result;
use crate::git::{short_hash, Repository};
use std::fmt;

/// Warnings about the repository state found before a release.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Tag carries the prefix but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Pushing is enabled but the remote is not configured
    RemoteMissing { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => write!(
                f,
                "No new commits since tag '{}' (current: {})",
                latest_tag,
                short_hash(current_commit_hash)
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::RemoteMissing { remote } => write!(
                f,
                "Remote '{}' is not configured; the tag will only be created locally",
                remote
            ),
        }
    }
}

/// Inspect the repository for conditions worth warning about before tagging
pub fn detect_boundary_warnings<R: Repository + ?Sized>(
    repo: &R,
    prefix: &str,
    remote: &str,
    push: bool,
) -> Result<Vec<BoundaryWarning>> {
    let mut warnings = Vec::new();

    let mut unparsable: Vec<BoundaryWarning> = repo
        .list_tags()?
        .into_iter()
        .filter_map(|tag| {
            let rest = tag.name.strip_prefix(prefix)?;
            Version::parse(rest).err().map(|e| BoundaryWarning::UnparsableTag {
                tag: tag.name.clone(),
                reason: e.to_string(),
            })
        })
        .collect();
    unparsable.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
    warnings.extend(unparsable);

    if let Some(latest) = repo.latest_tag(prefix)? {
        if repo.commits_since(&latest.tag.name)?.is_empty() {
            warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: latest.tag.name,
                current_commit_hash: repo.head()?,
            });
        }
    }

    if push && !repo.has_remote(remote)? {
        warnings.push(BoundaryWarning::RemoteMissing {
            remote: remote.to_string(),
        });
    }

    Ok(warnings)
}
