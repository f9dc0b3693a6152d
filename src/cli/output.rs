//! Machine-readable output for `--json`.

use crate::analyzer::AnalysisResult;
use crate::domain::VersionTag;
use crate::release::{ReleaseError, ReleaseResult};
use serde::Serialize;
use serde_json::json;

/// JSON document printed for a release attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonOutput {
    pub success: bool,
    pub previous_version: String,
    pub new_version: String,
    pub tag_name: String,
    pub commit_hash: String,
    pub tag_created: bool,
    pub pushed: bool,
    pub dry_run: bool,
    pub hooks_executed: usize,
    pub post_push_warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the tag exists even though the release failed
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub partial_success: bool,
}

impl JsonOutput {
    pub fn from_result(result: &ReleaseResult, dry_run: bool) -> Self {
        JsonOutput {
            success: true,
            previous_version: result.previous_version.clone(),
            new_version: result.new_version.clone(),
            tag_name: result.tag_name.clone(),
            commit_hash: result.commit_hash.clone(),
            tag_created: result.tag_created,
            pushed: result.pushed,
            dry_run,
            hooks_executed: result.hooks_executed,
            post_push_warnings: result.post_push_warnings.clone(),
            error: None,
            partial_success: false,
        }
    }

    pub fn from_release_error(err: &ReleaseError, dry_run: bool) -> Self {
        let mut output = match err.partial_result() {
            Some(result) => JsonOutput {
                partial_success: true,
                ..Self::from_result(result, dry_run)
            },
            None => JsonOutput {
                dry_run,
                ..Default::default()
            },
        };
        output.success = false;
        output.error = Some(err.to_string());
        output
    }

    /// A failure that happened before a release could start
    pub fn from_message(message: impl Into<String>, dry_run: bool) -> Self {
        JsonOutput {
            dry_run,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON document for the `analyze` subcommand
pub fn analysis_json(latest: Option<&VersionTag>, analysis: &AnalysisResult) -> serde_json::Value {
    json!({
        "latest_tag": latest.map(|found| found.tag.name.clone()),
        "latest_version": latest.map(|found| found.version.to_string()),
        "recommended_bump": analysis.recommended_bump.name(),
        "type_counts": analysis.type_counts,
        "breaking_count": analysis.breaking_count,
        "total_commits": analysis.total_commits,
    })
}
