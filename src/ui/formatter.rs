//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! The `format_*` functions build strings and are testable; the `display_*`
//! functions print them.

use console::style;

use crate::analyzer::AnalysisResult;
use crate::boundary::BoundaryWarning;
use crate::domain::VersionTag;
use crate::git::{short_hash, CommitRecord};
use crate::release::{ReleaseError, ReleaseResult};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change a release will make.
///
/// # Arguments
/// * `previous` - Previous version (`0.0.0` when there is no tag yet)
/// * `tag_name` - The tag that will be created
pub fn display_proposed_release(previous: &str, new_version: &str, tag_name: &str) {
    println!("\n{}", style("Proposed release:").bold());
    println!("  From: {}", style(previous).red());
    println!("  To:   {}", style(new_version).green());
    println!("  Tag:  {}", style(tag_name).cyan());
}

/// Lines summarising commits, at most `limit` of them
pub fn format_commit_list(commits: &[CommitRecord], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = commits
        .iter()
        .take(limit)
        .map(|commit| {
            let subject: String = commit.subject.chars().take(60).collect();
            format!("{} {}", commit.short_hash(), subject)
        })
        .collect();

    if commits.len() > limit {
        lines.push(format!("... and {} more commits", commits.len() - limit));
    }
    lines
}

/// Lines describing a conventional commit analysis
pub fn format_analysis(latest: Option<&VersionTag>, analysis: &AnalysisResult) -> Vec<String> {
    let mut lines = vec![
        match latest {
            Some(found) => format!("Latest tag: {}", found.tag.name),
            None => "Latest tag: none".to_string(),
        },
        format!("Commits: {}", analysis.total_commits),
    ];
    for (kind, count) in &analysis.type_counts {
        lines.push(format!("  {}: {}", kind, count));
    }
    if analysis.breaking_count > 0 {
        lines.push(format!("Breaking changes: {}", analysis.breaking_count));
    }
    lines.push(format!("Recommended bump: {}", analysis.recommended_bump));
    lines
}

/// Display commit analysis since the latest tag.
pub fn display_analysis(
    latest: Option<&VersionTag>,
    commits: &[CommitRecord],
    analysis: &AnalysisResult,
) {
    println!("\n{}", style("Commit analysis").bold());
    for line in format_commit_list(commits, 10) {
        println!("  {}", line);
    }
    for line in format_analysis(latest, analysis) {
        println!("{}", line);
    }
}

/// Lines describing a finished or partial release
pub fn format_release_result(result: &ReleaseResult, dry_run: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if dry_run {
        lines.push(format!(
            "[dry-run] Would create tag {} ({} -> {}) at {}",
            result.tag_name,
            result.previous_version,
            result.new_version,
            short_hash(&result.commit_hash)
        ));
        return lines;
    }

    if result.tag_created {
        lines.push(format!(
            "Created tag {} ({} -> {})",
            result.tag_name, result.previous_version, result.new_version
        ));
    }
    if result.pushed {
        lines.push(format!("Pushed {}", result.tag_name));
    }
    if result.hooks_executed > 0 {
        lines.push(format!("Hooks executed: {}", result.hooks_executed));
    }
    lines
}

/// Display the outcome of a release.
pub fn display_release_result(result: &ReleaseResult, dry_run: bool) {
    for line in format_release_result(result, dry_run) {
        display_success(&line);
    }
    for warning in &result.post_push_warnings {
        eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
    }
}

/// Display a failed release, explaining what already happened.
pub fn display_release_error(err: &ReleaseError) {
    display_error(&err.to_string());
    if let Some(result) = err.partial_result() {
        for line in format_release_result(result, false) {
            display_status(&line);
        }
        eprintln!(
            "{} The tag was not rolled back; delete it with `git tag -d {}` before retrying.",
            style("→").yellow(),
            result.tag_name
        );
    }
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}
