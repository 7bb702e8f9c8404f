//! Suggestion generation
//!
//! Maps finding groups to actionable, human-readable suggestions. Findings
//! are grouped by `(tool, code)`; each group yields at most one suggestion,
//! ordered by severity and truncated to the configured cap so the caller is
//! never overwhelmed.

use crate::config::SuggestConfig;
use crate::models::{compare_findings, Finding, SourceTool};
use std::collections::HashSet;

/// Canonical advice for known rule codes; None falls back to a generic
/// message built from the finding itself.
fn canonical_template(tool: SourceTool, code: &str) -> Option<&'static str> {
    match (tool, code) {
        (SourceTool::Syntax, "syntax-error") => {
            Some("Fix the syntax error first so static analysis can run cleanly.")
        }
        (SourceTool::Lint, "F401") => Some("Remove unused imports (ruff F401)."),
        (SourceTool::Lint, "F841") => Some("Remove unused local variables (ruff F841)."),
        (SourceTool::Lint, "E302") | (SourceTool::Lint, "E305") => {
            Some("Apply PEP 8 spacing around functions and classes.")
        }
        (SourceTool::Lint, "E501") => Some("Wrap long lines (E501) to improve readability."),
        (SourceTool::Lint, "E722") => {
            Some("Catch specific exceptions instead of a bare except clause.")
        }
        (SourceTool::Security, "B201") => {
            Some("Use Flask's built-in escaping or MarkupSafe for user input.")
        }
        (SourceTool::Security, "B301") => {
            Some("Avoid pickle for untrusted data; use JSON or safer serialization.")
        }
        (SourceTool::Security, "B303") => {
            Some("Replace MD5/SHA1 with SHA256 for anything security-sensitive.")
        }
        (SourceTool::Security, "B304") | (SourceTool::Security, "B311") => {
            Some("Use the secrets module instead of random for cryptographic purposes.")
        }
        (SourceTool::Security, "B306") => {
            Some("Avoid mktemp; use mkstemp or TemporaryFile instead.")
        }
        (SourceTool::Security, "B501") => {
            Some("Validate SSL/TLS certificates; don't use verify=False.")
        }
        (SourceTool::Security, "B506") => Some("Use yaml.safe_load() instead of yaml.load()."),
        (SourceTool::Security, "B601") | (SourceTool::Security, "B602") => {
            Some("Avoid shell=True in subprocess calls; pass list arguments.")
        }
        (SourceTool::Security, "B608") => {
            Some("Avoid SQL string concatenation; use parameterized queries.")
        }
        (SourceTool::Complexity, "high-cc") => {
            Some("Refactor large or nested functions to reduce cyclomatic complexity.")
        }
        _ => None,
    }
}

fn suggestion_for(finding: &Finding) -> String {
    if finding.is_unavailable() {
        let reason = finding
            .message
            .strip_prefix("analysis unavailable: ")
            .unwrap_or(&finding.message);
        return format!("Fix the analysis environment: {reason}.");
    }

    match canonical_template(finding.tool, &finding.code) {
        Some(template) => template.to_string(),
        None => format!(
            "Address {} {}: {}",
            finding.tool, finding.code, finding.message
        ),
    }
}

/// Generate the ranked, deduplicated suggestion list.
///
/// Invariants: never two suggestions for the same `(tool, code)` group;
/// never a suggestion without a corresponding finding; at most
/// `max_suggestions` entries.
pub fn suggest(findings: &[Finding], config: &SuggestConfig) -> Vec<String> {
    let mut ordered: Vec<&Finding> = findings.iter().collect();
    ordered.sort_by(|a, b| compare_findings(*a, *b).then_with(|| a.code.cmp(&b.code)));

    let mut seen: HashSet<(SourceTool, &str)> = HashSet::new();
    let mut suggestions = Vec::new();

    for finding in ordered {
        if suggestions.len() >= config.max_suggestions {
            break;
        }
        if seen.insert((finding.tool, finding.code.as_str())) {
            suggestions.push(suggestion_for(finding));
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn cfg() -> SuggestConfig {
        SuggestConfig::default()
    }

    fn finding(tool: SourceTool, severity: Severity, code: &str, line: u32) -> Finding {
        Finding::new(tool, severity, Some(line), code, format!("{code} issue"))
    }

    #[test]
    fn test_empty_findings_no_suggestions() {
        assert!(suggest(&[], &cfg()).is_empty());
    }

    #[test]
    fn test_one_suggestion_per_group() {
        let findings = vec![
            finding(SourceTool::Lint, Severity::Warning, "E501", 1),
            finding(SourceTool::Lint, Severity::Warning, "E501", 5),
            finding(SourceTool::Lint, Severity::Warning, "E501", 9),
        ];
        let suggestions = suggest(&findings, &cfg());
        assert_eq!(suggestions, vec!["Wrap long lines (E501) to improve readability."]);
    }

    #[test]
    fn test_severity_orders_suggestions() {
        let findings = vec![
            finding(SourceTool::Lint, Severity::Warning, "F401", 1),
            finding(SourceTool::Security, Severity::Critical, "B602", 3),
            finding(SourceTool::Syntax, Severity::Critical, "syntax-error", 1),
        ];
        let suggestions = suggest(&findings, &cfg());
        // Critical groups first; syntax line 1 precedes security line 3
        assert_eq!(suggestions[0], "Fix the syntax error first so static analysis can run cleanly.");
        assert!(suggestions[1].contains("shell=True"));
        assert!(suggestions[2].contains("unused imports"));
    }

    #[test]
    fn test_cap_respected() {
        let findings: Vec<Finding> = (0..30)
            .map(|i| finding(SourceTool::Lint, Severity::Warning, &format!("W{i:03}"), i + 1))
            .collect();
        let config = SuggestConfig { max_suggestions: 7 };
        assert_eq!(suggest(&findings, &config).len(), 7);
    }

    #[test]
    fn test_generic_fallback_uses_message() {
        let findings = vec![finding(SourceTool::Lint, Severity::Warning, "W999", 2)];
        let suggestions = suggest(&findings, &cfg());
        assert_eq!(suggestions, vec!["Address lint W999: W999 issue"]);
    }

    #[test]
    fn test_unavailable_gets_environment_hint() {
        let findings = vec![Finding::unavailable(SourceTool::Security, "bandit not installed")];
        let suggestions = suggest(&findings, &cfg());
        assert_eq!(
            suggestions,
            vec!["Fix the analysis environment: bandit not installed."]
        );
    }
}
