use crate::domain::prerelease::{PreRelease, PreReleaseType};
use crate::error::{BumpkinError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Versions are immutable values; every bump returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a release version with no pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// The version used as "previous" when a repository has no tags yet
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Parse a version string (e.g., "1.2.3", "v2.0.0-rc.1+build.5")
    ///
    /// A single leading `v` is tolerated; any other tag prefix must be stripped by
    /// the caller. Validation follows semver.org via the `semver` crate.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(BumpkinError::version("empty version string"));
        }

        let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let parsed = semver::Version::parse(clean)
            .map_err(|e| BumpkinError::version(format!("invalid version '{}': {}", text, e)))?;

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease: (!parsed.pre.is_empty()).then(|| parsed.pre.to_string()),
            build: (!parsed.build.is_empty()).then(|| parsed.build.to_string()),
        })
    }

    /// Version string with a tag prefix, e.g. `v1.2.3`
    pub fn with_prefix(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self)
    }

    /// Channel of the pre-release, if it is one bumpkin generates
    pub fn prerelease_type(&self) -> Option<PreReleaseType> {
        self.prerelease
            .as_deref()
            .and_then(|pre| PreRelease::parse(pre).ok())
            .and_then(|pre| pre.kind())
    }

    /// Bump version according to bump type
    ///
    /// `Custom` and `Conventional` are resolved by the caller and leave the
    /// version untouched here.
    ///
    /// # Errors
    /// * `Version` - the incremented component would exceed `u64::MAX`
    pub fn bump(&self, bump_type: &VersionBump) -> Result<Self> {
        let bumped = match bump_type {
            VersionBump::Major => Version::new(increment(self.major, "major")?, 0, 0),
            VersionBump::Minor => {
                Version::new(self.major, increment(self.minor, "minor")?, 0)
            }
            VersionBump::Patch => {
                Version::new(self.major, self.minor, increment(self.patch, "patch")?)
            }
            VersionBump::Release => Version::new(self.major, self.minor, self.patch),
            VersionBump::PreRelease(kind) => self.bump_prerelease(*kind)?,
            VersionBump::Custom(_) | VersionBump::Conventional => self.clone(),
        };
        Ok(bumped)
    }

    fn bump_prerelease(&self, kind: PreReleaseType) -> Result<Self> {
        let Some(existing) = self.prerelease.as_deref() else {
            return Ok(Version {
                prerelease: Some(PreRelease::start(kind).to_string()),
                ..Version::new(self.major, self.minor, increment(self.patch, "patch")?)
            });
        };

        // Switching channel (or replacing a foreign pre-release) keeps the triple.
        let next = match PreRelease::parse(existing) {
            Ok(current) if current.kind() == Some(kind) => current.increment_iteration()?,
            _ => PreRelease::start(kind),
        };

        Ok(Version {
            prerelease: Some(next.to_string()),
            ..Version::new(self.major, self.minor, self.patch)
        })
    }
}

fn increment(value: u64, component: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        BumpkinError::version(format!("{} version {} cannot be incremented", component, value))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = BumpkinError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| {
                compare_prerelease(self.prerelease.as_deref(), other.prerelease.as_deref())
            })
            // Build metadata has no precedence; it only breaks ties so Ord matches Eq.
            .then_with(|| self.build.cmp(&other.build))
    }
}

fn compare_prerelease(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => match (PreRelease::parse(a), PreRelease::parse(b)) {
            (Ok(left), Ok(right)) => left
                .identifier
                .cmp(&right.identifier)
                .then(left.iteration.cmp(&right.iteration)),
            _ => match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
                (Ok(left), Ok(right)) => left.cmp(&right),
                _ => a.cmp(b),
            },
        },
    }
}

/// Version bump requested for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
    /// Enter or advance a pre-release channel
    PreRelease(PreReleaseType),
    /// Promote a pre-release to its release version
    Release,
    /// Use the given literal version
    Custom(String),
    /// Derive major/minor/patch from conventional commits
    Conventional,
}

impl VersionBump {
    /// Name of the bump as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
            VersionBump::PreRelease(PreReleaseType::Alpha) => "prerelease-alpha",
            VersionBump::PreRelease(PreReleaseType::Beta) => "prerelease-beta",
            VersionBump::PreRelease(PreReleaseType::ReleaseCandidate) => "prerelease-rc",
            VersionBump::Release => "release",
            VersionBump::Custom(_) => "custom",
            VersionBump::Conventional => "conventional",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VersionBump {
    type Err = BumpkinError;

    /// `custom` parses to an empty literal; the caller fills in the target.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            "prerelease-alpha" => Ok(VersionBump::PreRelease(PreReleaseType::Alpha)),
            "prerelease-beta" => Ok(VersionBump::PreRelease(PreReleaseType::Beta)),
            "prerelease-rc" => Ok(VersionBump::PreRelease(PreReleaseType::ReleaseCandidate)),
            "release" => Ok(VersionBump::Release),
            "custom" => Ok(VersionBump::Custom(String::new())),
            "conventional" => Ok(VersionBump::Conventional),
            other => Err(BumpkinError::version(format!(
                "unknown bump type: '{}'",
                other
            ))),
        }
    }
}
