//! Command-line surface
//!
//! Argument parsing lives here rather than in `main.rs` so the mapping from
//! flags to a [ReleaseRequest] can be tested without spawning the binary.

pub mod completion;
pub mod exit_codes;
pub mod output;

pub use completion::write_completion;
pub use exit_codes::{exit_status, ExitError, ExitStatus};
pub use output::{analysis_json, JsonOutput};

use crate::config::Config;
use crate::domain::{PreReleaseType, VersionBump};
use crate::error::Result;
use crate::release::ReleaseRequest;
use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bumpkin",
    version,
    about = "Bump semantic versions, tag releases, and run release hooks"
)]
pub struct Cli {
    #[command(flatten)]
    pub bump: BumpArgs,

    #[arg(short, long, global = true, help = "Tag prefix [default: v]")]
    pub prefix: Option<String>,

    #[arg(short, long, global = true, help = "Git remote name [default: origin]")]
    pub remote: Option<String>,

    #[arg(short = 'C', long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Preview what would happen without making changes")]
    pub dry_run: bool,

    #[arg(long, help = "Create the tag but don't push it")]
    pub no_push: bool,

    #[arg(long, help = "Skip hook execution")]
    pub no_hooks: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    pub yes: bool,

    #[arg(long, global = true, help = "Output result as JSON")]
    pub json: bool,

    #[arg(long, value_name = "SECONDS", help = "Kill hooks still running after this many seconds")]
    pub hook_timeout: Option<u64>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Bump selection; at most one may be given
#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("bump-kind").multiple(false)))]
pub struct BumpArgs {
    #[arg(long, group = "bump-kind", help = "Bump patch version (x.y.Z)")]
    pub patch: bool,

    #[arg(long, group = "bump-kind", help = "Bump minor version (x.Y.0)")]
    pub minor: bool,

    #[arg(long, group = "bump-kind", help = "Bump major version (X.0.0)")]
    pub major: bool,

    #[arg(long, group = "bump-kind", value_name = "VERSION", help = "Set specific version")]
    pub set_version: Option<String>,

    #[arg(short = 'c', long, group = "bump-kind", help = "Derive the bump from conventional commits")]
    pub conventional: bool,

    #[arg(long, group = "bump-kind", help = "Bump to alpha prerelease")]
    pub alpha: bool,

    #[arg(long, group = "bump-kind", help = "Bump to beta prerelease")]
    pub beta: bool,

    #[arg(long, group = "bump-kind", help = "Bump to release candidate")]
    pub rc: bool,

    #[arg(long, group = "bump-kind", help = "Promote prerelease to release")]
    pub release: bool,

    #[arg(
        long = "bump",
        group = "bump-kind",
        value_name = "KIND",
        help = "Bump by name: major, minor, patch, prerelease-alpha, prerelease-beta, prerelease-rc, release, conventional"
    )]
    pub kind: Option<String>,
}

impl BumpArgs {
    /// The selected bump, if any flag was given
    ///
    /// # Errors
    /// * `Version` - `--bump` names an unknown bump kind
    pub fn selected(&self) -> Result<Option<VersionBump>> {
        if let Some(version) = &self.set_version {
            return Ok(Some(VersionBump::Custom(version.clone())));
        }
        if let Some(kind) = &self.kind {
            return kind.parse::<VersionBump>().map(Some);
        }
        let flags = [
            (self.patch, VersionBump::Patch),
            (self.minor, VersionBump::Minor),
            (self.major, VersionBump::Major),
            (self.conventional, VersionBump::Conventional),
            (self.alpha, VersionBump::PreRelease(PreReleaseType::Alpha)),
            (self.beta, VersionBump::PreRelease(PreReleaseType::Beta)),
            (
                self.rc,
                VersionBump::PreRelease(PreReleaseType::ReleaseCandidate),
            ),
            (self.release, VersionBump::Release),
        ];
        Ok(flags
            .into_iter()
            .find(|(set, _)| *set)
            .map(|(_, bump)| bump))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current version (latest tag)
    Current,
    /// Analyze commits since the latest tag and recommend a bump
    Analyze,
    /// Create a starter .bumpkin.toml in the current directory
    Init,
    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Configuration with command-line overrides applied
    pub fn effective_config(&self, file: Config) -> Config {
        let overrides = Config {
            prefix: self.prefix.clone().unwrap_or_default(),
            remote: self.remote.clone().unwrap_or_default(),
            hooks: Default::default(),
        };
        file.merge(&overrides)
    }

    /// The request for one release attempt
    pub fn release_request(&self, config: &Config, bump: VersionBump) -> ReleaseRequest {
        ReleaseRequest {
            dry_run: self.dry_run,
            push: !self.no_push,
            run_hooks: !self.no_hooks,
            ..config.release_request(bump)
        }
    }

    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout.map(Duration::from_secs)
    }
}
