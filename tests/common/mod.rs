// Shared fixtures for integration tests
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway git repository with a configured identity
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    counter: usize,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        TestRepo {
            dir,
            repo,
            counter: 0,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file and commit it with `message`
    pub fn commit(&mut self, message: &str) -> Oid {
        self.counter += 1;
        let file = format!("file{}.txt", self.counter);
        fs::write(self.path().join(&file), message).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(&file)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    /// Lightweight tag at HEAD
    pub fn tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.tag_lightweight(name, head.as_object(), false).unwrap();
    }

    /// Add a bare repository as remote `name`; keep the returned dir alive
    pub fn add_bare_remote(&self, name: &str) -> TempDir {
        let bare_dir = TempDir::new().unwrap();
        Repository::init_bare(bare_dir.path()).unwrap();
        self.repo
            .remote(name, bare_dir.path().to_str().unwrap())
            .unwrap();
        bare_dir
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.path().join("bumpkin.toml"), content).unwrap();
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.repo
            .tag_names(None)
            .unwrap()
            .iter()
            .flatten()
            .map(|s| s.to_string())
            .collect()
    }
}
