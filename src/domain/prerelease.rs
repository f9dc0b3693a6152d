//! Pre-release identifiers produced by prerelease bumps
//!
//! Only `alpha`, `beta` and `rc` are generated, always as `<type>.<n>`.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{BumpkinError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release channel (alpha, beta or rc)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreReleaseType {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
}

impl PreReleaseType {
    /// Identifier as written in a version string
    pub fn as_str(&self) -> &'static str {
        match self {
            PreReleaseType::Alpha => "alpha",
            PreReleaseType::Beta => "beta",
            PreReleaseType::ReleaseCandidate => "rc",
        }
    }
}

impl FromStr for PreReleaseType {
    type Err = BumpkinError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(PreReleaseType::Alpha),
            "beta" => Ok(PreReleaseType::Beta),
            "rc" => Ok(PreReleaseType::ReleaseCandidate),
            other => Err(BumpkinError::version(format!(
                "Unknown pre-release type: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PreReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<type>.<n>` pre-release such as `beta.1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// Free-form type token; generated ones are alpha, beta or rc
    pub identifier: String,
    /// Iteration counter within the channel
    pub iteration: u64,
}

impl PreRelease {
    /// Start a fresh channel at iteration 0
    pub fn start(kind: PreReleaseType) -> Self {
        PreRelease {
            identifier: kind.as_str().to_string(),
            iteration: 0,
        }
    }

    /// Parse a pre-release string of the form `<type>.<n>`
    ///
    /// # Examples
    /// ```ignore
    /// let pr = PreRelease::parse("beta.1")?;
    /// assert_eq!(pr.identifier, "beta");
    /// assert_eq!(pr.iteration, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(BumpkinError::version("Empty pre-release identifier"));
        }

        let (identifier, number) = s.split_once('.').ok_or_else(|| {
            BumpkinError::version(format!("Invalid pre-release format: '{}'", s))
        })?;

        if identifier.is_empty() {
            return Err(BumpkinError::version("Empty pre-release type"));
        }

        let iteration = number.parse::<u64>().map_err(|_| {
            BumpkinError::version(format!("Invalid iteration number: '{}'", number))
        })?;

        Ok(PreRelease {
            identifier: identifier.to_string(),
            iteration,
        })
    }

    /// The channel, when the identifier is one bumpkin knows
    pub fn kind(&self) -> Option<PreReleaseType> {
        self.identifier.parse().ok()
    }

    /// Next iteration in the same channel
    pub fn increment_iteration(&self) -> Result<Self> {
        let iteration = self.iteration.checked_add(1).ok_or_else(|| {
            BumpkinError::version(format!("pre-release '{}' cannot be incremented", self))
        })?;
        Ok(PreRelease {
            identifier: self.identifier.clone(),
            iteration,
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.identifier, self.iteration)
    }
}
