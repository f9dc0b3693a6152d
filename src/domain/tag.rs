use crate::domain::version::Version;

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Commit the tag points at (peeled through annotated tags)
    pub commit_hash: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit_hash: commit_hash.into(),
        }
    }

    /// Semantic version encoded in the tag name after `prefix`
    ///
    /// Returns `None` when the name does not start with the prefix or the rest
    /// is not a valid version (e.g. "v1.2.3" with prefix "v" -> 1.2.3).
    pub fn version(&self, prefix: &str) -> Option<Version> {
        self.name
            .strip_prefix(prefix)
            .and_then(|rest| Version::parse(rest).ok())
    }
}

/// A tag together with the version parsed from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub tag: Tag,
    pub version: Version,
}

/// Highest-versioned tag whose name starts with `prefix`
///
/// Tags that do not parse as a semantic version are ignored.
pub fn latest_version_tag(tags: Vec<Tag>, prefix: &str) -> Option<VersionTag> {
    tags.into_iter()
        .filter_map(|tag| tag.version(prefix).map(|version| VersionTag { tag, version }))
        .max_by(|a, b| a.version.cmp(&b.version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_version_with_prefix() {
        let tag = Tag::new("v1.2.3", "abc");
        assert_eq!(tag.version("v"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_tag_version_custom_prefix() {
        let tag = Tag::new("release-2.0.0-rc.1", "abc");
        assert_eq!(
            tag.version("release-").map(|v| v.to_string()),
            Some("2.0.0-rc.1".to_string())
        );
        assert_eq!(tag.version("v"), None);
    }

    #[test]
    fn test_tag_version_non_semver() {
        assert_eq!(Tag::new("vnext", "abc").version("v"), None);
        assert_eq!(Tag::new("v1.2", "abc").version("v"), None);
    }

    #[test]
    fn test_latest_version_tag_picks_highest_semver() {
        let tags = vec![
            Tag::new("v1.2.0", "a"),
            Tag::new("v1.10.0", "b"),
            Tag::new("v1.10.0-rc.1", "c"),
            Tag::new("latest", "d"),
            Tag::new("app-9.0.0", "e"),
        ];

        let latest = latest_version_tag(tags, "v").unwrap();
        assert_eq!(latest.tag.name, "v1.10.0");
        assert_eq!(latest.version, Version::new(1, 10, 0));
    }

    #[test]
    fn test_latest_version_tag_none_matching() {
        let tags = vec![Tag::new("nightly", "a")];
        assert!(latest_version_tag(tags, "v").is_none());
        assert!(latest_version_tag(Vec::new(), "v").is_none());
    }
}
