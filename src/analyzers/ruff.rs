//! Ruff-based lint adapter
//!
//! Runs ruff over the snippet and normalizes its diagnostics into lint
//! findings. Rule-code classes decide severity: syntax-class (E9xx) and
//! undefined-name-class (F82x) rules are errors, the rest are warnings.

use crate::analyzers::base::{Analyzer, AnalyzerOutput};
use crate::analyzers::external_tool::{run_external_tool, write_snippet};
use crate::models::{Finding, Severity, SourceTool};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, info};

/// Ruff lint analyzer
pub struct RuffAnalyzer {
    timeout_secs: u64,
    max_findings: usize,
}

impl RuffAnalyzer {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            max_findings: 100,
        }
    }

    pub fn with_max_findings(mut self, max: usize) -> Self {
        self.max_findings = max;
        self
    }

    /// Map a ruff rule code to our severity
    fn map_severity(code: &str) -> Severity {
        if code.starts_with("E9") || code.starts_with("F82") {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// Parse ruff's JSON diagnostics into findings
    fn parse_output(stdout: &str, total_lines: u32) -> Option<Vec<Finding>> {
        let diagnostics: Vec<JsonValue> = serde_json::from_str(stdout).ok()?;

        let findings = diagnostics
            .iter()
            .filter_map(|d| {
                let code = d.get("code").and_then(|c| c.as_str()).unwrap_or("RUFF");
                let message = d.get("message").and_then(|m| m.as_str()).unwrap_or("Lint");
                let line = d
                    .get("location")
                    .and_then(|loc| loc.get("row"))
                    .and_then(|r| r.as_u64())
                    .map(|r| (r as u32).clamp(1, total_lines.max(1)));

                Some(Finding::new(
                    SourceTool::Lint,
                    Self::map_severity(code),
                    line,
                    code,
                    message,
                ))
            })
            .collect();

        Some(findings)
    }
}

impl Analyzer for RuffAnalyzer {
    fn name(&self) -> &'static str {
        "ruff"
    }

    fn tool(&self) -> SourceTool {
        SourceTool::Lint
    }

    fn analyze(&self, code: &str, _filename: &str) -> AnalyzerOutput {
        if code.trim().is_empty() {
            return AnalyzerOutput::default();
        }

        let start = Instant::now();
        let snippet = match write_snippet(code) {
            Ok(file) => file,
            Err(e) => return AnalyzerOutput::unavailable(SourceTool::Lint, e),
        };

        let cmd = vec![
            "ruff".to_string(),
            "check".to_string(),
            "--output-format".to_string(),
            "json".to_string(),
            snippet.path().to_string_lossy().to_string(),
        ];

        let result = run_external_tool(&cmd, "ruff", self.timeout_secs);

        if result.timed_out {
            return AnalyzerOutput::unavailable(SourceTool::Lint, "ruff timed out");
        }
        if let Some(error) = result.error {
            return AnalyzerOutput::unavailable(SourceTool::Lint, error);
        }
        // ruff: 0 clean, 1 findings, anything else is an internal error
        if !matches!(result.return_code, Some(0) | Some(1)) {
            let reason = if result.stderr.is_empty() {
                "ruff failed".to_string()
            } else {
                result.stderr.lines().next().unwrap_or("ruff failed").to_string()
            };
            return AnalyzerOutput::unavailable(SourceTool::Lint, reason);
        }

        let total_lines = code.lines().count() as u32;
        let findings = match Self::parse_output(&result.stdout, total_lines) {
            Some(mut findings) => {
                findings.truncate(self.max_findings);
                findings
            }
            None => {
                debug!("Failed to parse ruff output: {}", result.stdout);
                return AnalyzerOutput::unavailable(SourceTool::Lint, "unparseable ruff output");
            }
        };

        info!("ruff reported {} findings", findings.len());
        AnalyzerOutput {
            findings,
            metrics: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(RuffAnalyzer::map_severity("E999"), Severity::Error);
        assert_eq!(RuffAnalyzer::map_severity("F821"), Severity::Error);
        assert_eq!(RuffAnalyzer::map_severity("F401"), Severity::Warning);
        assert_eq!(RuffAnalyzer::map_severity("E501"), Severity::Warning);
    }

    #[test]
    fn test_parse_output() {
        let stdout = r#"[
            {"code": "F401", "message": "`os` imported but unused", "location": {"row": 1, "column": 8}},
            {"code": "E501", "message": "Line too long", "location": {"row": 3, "column": 89}}
        ]"#;
        let findings = RuffAnalyzer::parse_output(stdout, 10).expect("parse");
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].code, "F401");
        assert_eq!(findings[0].line, Some(1));
        assert_eq!(findings[0].tool, SourceTool::Lint);
        assert_eq!(findings[1].line, Some(3));
    }

    #[test]
    fn test_parse_output_clamps_line() {
        let stdout = r#"[{"code": "W292", "message": "No newline at end of file", "location": {"row": 99, "column": 1}}]"#;
        let findings = RuffAnalyzer::parse_output(stdout, 4).expect("parse");
        assert_eq!(findings[0].line, Some(4));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(RuffAnalyzer::parse_output("not json", 1).is_none());
    }
}
