//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use commit::ClassifiedCommit;
pub use prerelease::{PreRelease, PreReleaseType};
pub use tag::{latest_version_tag, Tag, VersionTag};
pub use version::{Version, VersionBump};
