//! Core data models for critique
//!
//! These models are used throughout the codebase for representing
//! normalized findings, quality scores, review results, and chat turns.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Generate a deterministic finding ID based on content hash.
///
/// Stable IDs across runs enable deduplication and tracking findings
/// over time. The ID is a 16-character hex string derived from hashing
/// the tool, line, rule code, and message.
pub fn deterministic_finding_id(
    tool: SourceTool,
    line: Option<u32>,
    code: &str,
    message: &str,
) -> String {
    // MD5 for stable cross-version hashing; DefaultHasher is intentionally
    // not stable across Rust/compiler versions.
    let input = format!("{tool}\n{}\n{code}\n{message}", line.unwrap_or(0));
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Which analyzer produced a finding
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceTool {
    #[default]
    Lint,
    Security,
    Complexity,
    Syntax,
}

impl std::fmt::Display for SourceTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTool::Lint => write!(f, "lint"),
            SourceTool::Security => write!(f, "security"),
            SourceTool::Complexity => write!(f, "complexity"),
            SourceTool::Syntax => write!(f, "syntax"),
        }
    }
}

/// Severity levels for findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Rule code carried by synthetic "tool could not run" findings
pub const UNAVAILABLE_CODE: &str = "unavailable";

/// One normalized diagnostic from an analyzer
///
/// `line` is 1-indexed and, when present, never exceeds the line count of
/// the submitted code (adapters clamp before constructing the finding).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Finding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tool: SourceTool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl Finding {
    pub fn new(
        tool: SourceTool,
        severity: Severity,
        line: Option<u32>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let code = code.into();
        let message = message.into();
        Self {
            id: deterministic_finding_id(tool, line, &code, &message),
            tool,
            severity,
            line,
            code,
            message,
        }
    }

    /// Synthetic finding for a tool that failed to run or produce output.
    ///
    /// Recovered locally per the error taxonomy: a tool crash never
    /// surfaces as a request failure.
    pub fn unavailable(tool: SourceTool, reason: impl std::fmt::Display) -> Self {
        Self::new(
            tool,
            Severity::Warning,
            None,
            UNAVAILABLE_CODE,
            format!("analysis unavailable: {reason}"),
        )
    }

    /// True for synthetic "tool could not run" findings
    pub fn is_unavailable(&self) -> bool {
        self.code == UNAVAILABLE_CODE
    }

    /// Deduplication key: two findings are duplicates iff they share this
    pub fn dedup_key(&self) -> (SourceTool, Option<u32>, &str) {
        (self.tool, self.line, self.code.as_str())
    }
}

/// Stable finding order: severity descending, then line ascending
/// (findings without a line sort last), then tool.
pub fn compare_findings(a: &Finding, b: &Finding) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| match (a.line, b.line) {
            (Some(la), Some(lb)) => la.cmp(&lb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.tool.cmp(&b.tool))
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Error => summary.error += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Structural metrics supplied by the complexity adapter
///
/// Carried alongside findings as auxiliary data consumed by the scorer and
/// the summary digest, never exposed as findings themselves.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuralMetrics {
    pub maintainability_index: Option<f64>,
    pub avg_complexity: Option<f64>,
    pub max_complexity: Option<f64>,
}

impl StructuralMetrics {
    /// Human label for the average cyclomatic complexity
    pub fn complexity_label(&self) -> &'static str {
        match self.avg_complexity {
            None => "n/a",
            Some(cc) if cc == 0.0 => "trivial",
            Some(cc) if cc <= 3.0 => "low",
            Some(cc) if cc <= 6.0 => "moderate",
            Some(cc) if cc <= 10.0 => "high",
            Some(_) => "very high",
        }
    }
}

/// The four bounded quality scores for one analysis run
///
/// Each score is a pure function of the finding set and structural metrics
/// for a single run; no state carries across runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreSet {
    pub readability: u8,
    pub complexity: u8,
    pub security: u8,
    pub testing: u8,
}

impl ScoreSet {
    /// All-zero scores, used when the code did not parse
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.readability, self.complexity, self.security, self.testing]
    }
}

/// Aggregated result of one analysis request
///
/// Owned exclusively by one request; never shared or mutated after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub summary: String,
    pub scores: ScoreSet,
    pub findings: Vec<Finding>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Conversation roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
