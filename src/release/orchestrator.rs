use crate::analyzer::analyze_repository;
use crate::domain::{Version, VersionBump};
use crate::error::{BumpkinError, Result};
use crate::git::Repository;
use crate::hooks::{
    create_hooks, CancelToken, FailurePolicy, HookContext, HookPhase, HookRunner, SequenceReport,
};
use crate::release::{ReleaseError, ReleasePhase, ReleaseRequest, ReleaseResult};
use tracing::{debug, info, warn};

/// Outcome of [`ReleaseOrchestrator::execute`]
pub type ReleaseOutcome = std::result::Result<ReleaseResult, ReleaseError>;

/// Previous and next version of a planned release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPlan {
    pub previous: Version,
    pub next: Version,
}

/// Drives one release attempt through its phases
///
/// Phases run strictly in order: compute the version, pre-tag hooks, create
/// the tag, post-tag hooks, push, post-push hooks.
pub struct ReleaseOrchestrator<'a, R: Repository + ?Sized> {
    repo: &'a R,
    runner: HookRunner,
}

impl<'a, R: Repository + ?Sized> ReleaseOrchestrator<'a, R> {
    pub fn new(repo: &'a R, runner: HookRunner) -> Self {
        ReleaseOrchestrator { repo, runner }
    }

    /// Resolve the previous version from tags and apply the requested bump
    ///
    /// # Errors
    /// * `Version` - custom literal missing or invalid
    /// * any repository error from tag lookup or commit analysis
    pub fn plan(&self, request: &ReleaseRequest) -> Result<VersionPlan> {
        let prefix = request.prefix();
        let previous = self
            .repo
            .latest_tag(prefix)?
            .map(|latest| latest.version)
            .unwrap_or_else(Version::zero);

        let next = match &request.bump {
            VersionBump::Custom(literal) => {
                let literal = literal.trim();
                if literal.is_empty() {
                    return Err(BumpkinError::version("custom version not specified"));
                }
                let literal = literal.strip_prefix(prefix).unwrap_or(literal);
                Version::parse(literal)
                    .map_err(|e| BumpkinError::version(format!("invalid custom version: {}", e)))?
            }
            VersionBump::Conventional => {
                let analysis = analyze_repository(self.repo, prefix)?;
                debug!(
                    bump = %analysis.recommended_bump,
                    commits = analysis.total_commits,
                    breaking = analysis.breaking_count,
                    "conventional analysis"
                );
                previous.bump(&analysis.recommended_bump)?
            }
            bump => previous.bump(bump)?,
        };

        Ok(VersionPlan { previous, next })
    }

    /// Run the release described by `request`
    ///
    /// Returns `PartialSuccess` only when a post-tag hook fails after the tag
    /// exists. Post-push hook failures end up in `post_push_warnings`.
    pub fn execute(&self, request: &ReleaseRequest, cancel: &CancelToken) -> ReleaseOutcome {
        let prefix = request.prefix();
        let remote = request.remote();

        let plan = self
            .plan(request)
            .map_err(|e| ReleaseError::failed(ReleasePhase::ComputingVersion, e))?;
        let head = self
            .repo
            .head()
            .map_err(|e| ReleaseError::failed(ReleasePhase::ComputingVersion, e))?;

        let tag_name = plan.next.with_prefix(prefix);
        let mut result = ReleaseResult {
            previous_version: plan.previous.to_string(),
            new_version: plan.next.to_string(),
            tag_name: tag_name.clone(),
            commit_hash: head.clone(),
            ..Default::default()
        };
        info!(
            previous = %result.previous_version,
            next = %result.new_version,
            tag = %tag_name,
            dry_run = request.dry_run,
            "computed release version"
        );

        if request.dry_run {
            return Ok(result);
        }

        let ctx = HookContext {
            version: result.new_version.clone(),
            previous_version: result.previous_version.clone(),
            tag: tag_name.clone(),
            prefix: prefix.to_string(),
            remote: remote.to_string(),
            commit_hash: head,
            dry_run: false,
        };

        let pre_tag = self.run_phase(request, &request.hooks.pre_tag, HookPhase::PreTag, &ctx, cancel);
        result.hooks_executed += pre_tag.results.len();
        if let Some(err) = pre_tag.error {
            return Err(ReleaseError::failed(ReleasePhase::PreTagHooks, err));
        }

        self.repo
            .create_tag(&tag_name, &format!("Release {}", tag_name))
            .map_err(|e| ReleaseError::failed(ReleasePhase::Tagging, e))?;
        result.tag_created = true;
        info!(tag = %tag_name, "tag created");

        let post_tag =
            self.run_phase(request, &request.hooks.post_tag, HookPhase::PostTag, &ctx, cancel);
        result.hooks_executed += post_tag.results.len();
        if let Some(err) = post_tag.error {
            warn!(tag = %tag_name, error = %err, "post-tag hook failed after tagging");
            return Err(ReleaseError::PartialSuccess {
                phase: ReleasePhase::PostTagHooks,
                source: err,
                result: Box::new(result),
            });
        }

        if request.push {
            let has_remote = self
                .repo
                .has_remote(remote)
                .map_err(|e| ReleaseError::failed(ReleasePhase::Pushing, e))?;
            if has_remote {
                self.repo
                    .push_tag(&tag_name, remote)
                    .map_err(|e| ReleaseError::failed(ReleasePhase::Pushing, e))?;
                result.pushed = true;
                info!(tag = %tag_name, remote, "tag pushed");
            } else {
                info!(remote, "remote not configured, skipping push");
            }
        }

        if result.pushed {
            let post_push = self.run_phase(
                request,
                &request.hooks.post_push,
                HookPhase::PostPush,
                &ctx,
                cancel,
            );
            result.hooks_executed += post_push.results.len();
            result.post_push_warnings = post_push.warnings;
        }

        Ok(result)
    }

    fn run_phase(
        &self,
        request: &ReleaseRequest,
        commands: &[String],
        phase: HookPhase,
        ctx: &HookContext,
        cancel: &CancelToken,
    ) -> SequenceReport {
        if !request.run_hooks || commands.is_empty() {
            return SequenceReport::default();
        }

        let policy = match phase {
            HookPhase::PostPush => FailurePolicy::FailOpen,
            HookPhase::PreTag | HookPhase::PostTag => FailurePolicy::FailClosed,
        };
        self.runner
            .run_sequence(&create_hooks(commands, phase), ctx, policy, cancel)
    }
}
