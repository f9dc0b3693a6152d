use crate::domain::Tag;
use crate::error::{BumpkinError, Result};
use crate::git::{CommitRecord, Repository};
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

const EMPTY_HEAD: &str = "0000000000000000000000000000000000000000";

/// Mock repository for testing without actual git operations
///
/// Commits are linear, added oldest first; HEAD is the last one added.
/// Tags created through the trait point at HEAD and are recorded.
pub struct MockRepository {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    commits: Vec<CommitRecord>,
    tags: Vec<Tag>,
    remotes: HashSet<String>,
    created: Vec<(String, String)>,
    pushed: Vec<(String, String)>,
    create_error: Option<String>,
    push_error: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Append a commit on top of HEAD
    pub fn with_commit(self, message: &str, hash: &str) -> Self {
        {
            let mut state = self.lock();
            let seconds = state.commits.len() as i64;
            let timestamp = Utc
                .timestamp_opt(1_700_000_000 + seconds, 0)
                .single()
                .unwrap_or_else(Utc::now);
            state
                .commits
                .push(CommitRecord::new(hash, message, "Mock Author", timestamp));
        }
        self
    }

    /// Add a tag pointing at a commit hash
    pub fn with_tag(self, name: &str, commit_hash: &str) -> Self {
        self.lock().tags.push(Tag::new(name, commit_hash));
        self
    }

    /// Register a remote name
    pub fn with_remote(self, name: &str) -> Self {
        self.lock().remotes.insert(name.to_string());
        self
    }

    /// Make every `create_tag` call fail with a tag error
    pub fn failing_create_tag(self, message: &str) -> Self {
        self.lock().create_error = Some(message.to_string());
        self
    }

    /// Make every `push_tag` call fail with a remote error
    pub fn failing_push(self, message: &str) -> Self {
        self.lock().push_error = Some(message.to_string());
        self
    }

    /// `(name, message)` of tags created through the trait
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.lock().created.clone()
    }

    /// `(tag, remote)` of successful pushes
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.lock().pushed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Poisoning is ignored; assertions still need the state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn head(&self) -> String {
        self.commits
            .last()
            .map(|c| c.hash.clone())
            .unwrap_or_else(|| EMPTY_HEAD.to_string())
    }

    fn newest_first(&self, commits: &[CommitRecord]) -> Vec<CommitRecord> {
        commits.iter().rev().cloned().collect()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.lock().tags.clone())
    }

    fn commits_since(&self, tag_name: &str) -> Result<Vec<CommitRecord>> {
        let state = self.lock();
        let tag = state
            .tags
            .iter()
            .find(|t| t.name == tag_name)
            .ok_or_else(|| BumpkinError::tag(format!("tag '{}' not found", tag_name)))?;

        let after = state
            .commits
            .iter()
            .position(|c| c.hash == tag.commit_hash)
            .map(|index| index + 1)
            .unwrap_or(0);

        Ok(state.newest_first(&state.commits[after..]))
    }

    fn all_commits(&self) -> Result<Vec<CommitRecord>> {
        let state = self.lock();
        Ok(state.newest_first(&state.commits))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(err) = &state.create_error {
            return Err(BumpkinError::tag(err.clone()));
        }
        if state.tags.iter().any(|t| t.name == name) {
            return Err(BumpkinError::TagExists(name.to_string()));
        }

        let head = state.head();
        state.tags.push(Tag::new(name, head));
        state.created.push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.lock().remotes.contains(name))
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let mut state = self.lock();
        if let Some(err) = &state.push_error {
            return Err(BumpkinError::remote(err.clone()));
        }
        if !state.remotes.contains(remote) {
            return Err(BumpkinError::remote(format!("remote '{}' not found", remote)));
        }
        state.pushed.push((name.to_string(), remote.to_string()));
        Ok(())
    }

    fn head(&self) -> Result<String> {
        Ok(self.lock().head())
    }
}
