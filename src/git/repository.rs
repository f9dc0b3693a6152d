use crate::domain::Tag;
use crate::error::{BumpkinError, Result};
use crate::git::CommitRecord;
use chrono::{TimeZone, Utc};
use git2::{Commit, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Wrapper around git2::Repository with our trait interface
///
/// `git2::Repository` is `Send` but not `Sync`; the mutex makes the wrapper
/// shareable as the trait requires.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|e| BumpkinError::tag(format!("repository lock poisoned: {}", e)))
    }
}

fn record_from_commit(commit: &Commit<'_>) -> CommitRecord {
    let message = commit.message().unwrap_or("(empty message)");
    let author = commit.author().name().unwrap_or("unknown").to_string();
    let timestamp = Utc
        .timestamp_opt(commit.author().when().seconds(), 0)
        .single()
        .unwrap_or_default();

    CommitRecord::new(commit.id().to_string(), message, author, timestamp)
}

fn tag_target(repo: &Git2Repo, tag_name: &str) -> Result<Option<Oid>> {
    match repo.find_reference(&format!("refs/tags/{}", tag_name)) {
        // Tags on trees or blobs carry no version history; skip them.
        Ok(reference) => Ok(reference.peel_to_commit().ok().map(|commit| commit.id())),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(BumpkinError::tag(format!(
            "Cannot find tag '{}': {}",
            tag_name, e
        ))),
    }
}

fn walk_from_head(repo: &Git2Repo, hide: Option<Oid>) -> Result<Vec<CommitRecord>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;
    if let Some(oid) = hide {
        revwalk.hide(oid)?;
    }

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        commits.push(record_from_commit(&commit));
    }
    Ok(commits)
}

/// Credentials for pushing: ssh keys from ~/.ssh, then the ssh agent, then defaults
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        let repo = self.lock()?;
        let names = repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            if let Some(oid) = tag_target(&repo, name)? {
                tags.push(Tag::new(name, oid.to_string()));
            }
        }
        Ok(tags)
    }

    fn commits_since(&self, tag_name: &str) -> Result<Vec<CommitRecord>> {
        let repo = self.lock()?;
        let target = tag_target(&repo, tag_name)?
            .ok_or_else(|| BumpkinError::tag(format!("tag '{}' not found", tag_name)))?;
        walk_from_head(&repo, Some(target))
    }

    fn all_commits(&self) -> Result<Vec<CommitRecord>> {
        let repo = self.lock()?;
        walk_from_head(&repo, None)
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let repo = self.lock()?;
        if tag_target(&repo, name)?.is_some() {
            return Err(BumpkinError::TagExists(name.to_string()));
        }

        let head = repo.head()?.peel_to_commit()?;
        let tagger = match repo.signature() {
            Ok(signature) => signature,
            Err(_) => {
                let author = head.author();
                git2::Signature::now(
                    author.name().unwrap_or("bumpkin"),
                    author.email().unwrap_or("bumpkin@localhost"),
                )?
            }
        };

        repo.tag(name, head.as_object(), &tagger, message, false)
            .map_err(|e| match e.code() {
                ErrorCode::Exists => BumpkinError::TagExists(name.to_string()),
                _ => BumpkinError::tag(format!("Cannot create tag '{}': {}", name, e)),
            })?;
        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        let repo = self.lock()?;
        let found = repo.find_remote(name).map(|_| ());
        match found {
            Ok(()) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(false),
            Err(e) => Err(BumpkinError::remote(format!(
                "Cannot look up remote '{}': {}",
                name, e
            ))),
        }
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let repo = self.lock()?;
        let mut git_remote = repo
            .find_remote(remote)
            .map_err(|e| BumpkinError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        git_remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    BumpkinError::remote(format!("Network error during push: {}", e))
                }
                _ => BumpkinError::remote(format!("Failed to push tag '{}': {}", name, e)),
            })
    }

    fn head(&self) -> Result<String> {
        let repo = self.lock()?;
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }
}
