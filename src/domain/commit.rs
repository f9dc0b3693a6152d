use regex::Regex;
use std::sync::LazyLock;

/// Commit types recognised by the classifier
pub const CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Type assigned to anything outside [`CONVENTIONAL_TYPES`]
pub const OTHER_TYPE: &str = "other";

// Groups: 1=type, 2=scope, 3=!, 4=description
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z]+)(?:\(([^)]+)\))?(!)?\s*:\s*(.+)$").expect("valid header regex")
});

static BREAKING_FOOTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*BREAKING[ -]CHANGE\s*:").expect("valid breaking footer regex")
});

static FOOTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z-]+)\s*[:#]\s*(.*)$").expect("valid footer regex")
});

/// A commit message classified according to conventional commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub body: String,
    pub is_breaking_change: bool,
    /// Trailer lines such as `Reviewed-by: name` or `Fixes #12`, in order
    pub footers: Vec<(String, String)>,
}

impl ClassifiedCommit {
    /// Parse a commit message according to conventional commits spec
    ///
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text (typed "other")
    pub fn parse(message: &str) -> Self {
        let mut lines = message.lines();
        let header = lines.next().unwrap_or("").trim();

        let mut commit = ClassifiedCommit {
            r#type: OTHER_TYPE.to_string(),
            scope: None,
            description: String::new(),
            body: String::new(),
            is_breaking_change: false,
            footers: Vec::new(),
        };

        if let Some(captures) = HEADER_PATTERN.captures(header) {
            let commit_type = captures[1].to_lowercase();
            if CONVENTIONAL_TYPES.contains(&commit_type.as_str()) {
                commit.r#type = commit_type;
                commit.scope = captures.get(2).map(|m| m.as_str().to_string());
                commit.is_breaking_change = captures.get(3).is_some();
                commit.description = captures[4].trim().to_string();
            }
        }

        let remaining = lines.collect::<Vec<_>>().join("\n");
        let remaining = remaining.trim();
        if !remaining.is_empty() {
            if BREAKING_FOOTER_PATTERN.is_match(remaining) {
                commit.is_breaking_change = true;
            }
            let (body, footers) = split_body_and_footers(remaining);
            commit.body = body;
            commit.footers = footers;
        }

        commit
    }

    /// True for any type in the conventional vocabulary
    pub fn is_conventional(&self) -> bool {
        self.r#type != OTHER_TYPE
    }
}

/// Body is every non-empty line before the first footer-looking line.
fn split_body_and_footers(content: &str) -> (String, Vec<(String, String)>) {
    let mut body_lines = Vec::new();
    let mut footers = Vec::new();
    let mut in_body = true;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(footer) = parse_footer(trimmed) {
            in_body = false;
            footers.push(footer);
            continue;
        }

        if in_body && !trimmed.is_empty() {
            body_lines.push(line);
        }
    }

    (body_lines.join("\n").trim().to_string(), footers)
}

fn parse_footer(line: &str) -> Option<(String, String)> {
    for token in ["BREAKING CHANGE", "BREAKING-CHANGE"] {
        if let Some(value) = line
            .strip_prefix(token)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            return Some((token.to_string(), value.trim().to_string()));
        }
    }

    FOOTER_PATTERN
        .captures(line)
        .map(|captures| (captures[1].to_string(), captures[2].trim().to_string()))
}
