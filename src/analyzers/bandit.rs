//! Bandit-based security adapter
//!
//! Runs bandit over the snippet, detecting issues like:
//! - SQL injection
//! - Command injection
//! - Hardcoded passwords
//! - Insecure cryptographic algorithms

use crate::analyzers::base::{Analyzer, AnalyzerOutput};
use crate::analyzers::external_tool::{run_external_tool, write_snippet};
use crate::models::{Finding, Severity, SourceTool};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, info};

/// Bandit security analyzer
pub struct BanditAnalyzer {
    timeout_secs: u64,
    max_findings: usize,
}

impl BanditAnalyzer {
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

    /// Map bandit severity/confidence to our severity
    fn map_severity(issue_severity: &str, issue_confidence: &str) -> Severity {
        let base = match issue_severity.to_uppercase().as_str() {
            "HIGH" => Severity::Critical,
            "MEDIUM" => Severity::Error,
            "LOW" => Severity::Warning,
            _ => Severity::Warning,
        };

        // Downgrade one step if confidence is low
        if issue_confidence.to_uppercase() == "LOW" {
            match base {
                Severity::Critical => Severity::Error,
                Severity::Error => Severity::Warning,
                other => other,
            }
        } else {
            base
        }
    }

    /// Parse bandit's JSON report into findings
    fn parse_results(stdout: &str, total_lines: u32) -> Option<Vec<Finding>> {
        let report: JsonValue = serde_json::from_str(stdout).ok()?;
        let results = report.get("results")?.as_array()?;

        let findings = results
            .iter()
            .map(|r| {
                let test_id = r.get("test_id").and_then(|v| v.as_str()).unwrap_or("BANDIT");
                let issue_text = r
                    .get("issue_text")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Potential security issue");
                let issue_severity = r
                    .get("issue_severity")
                    .and_then(|v| v.as_str())
                    .unwrap_or("MEDIUM");
                let issue_confidence = r
                    .get("issue_confidence")
                    .and_then(|v| v.as_str())
                    .unwrap_or("MEDIUM");
                let line = r
                    .get("line_number")
                    .and_then(|v| v.as_u64())
                    .filter(|&n| n > 0)
                    .map(|n| (n as u32).clamp(1, total_lines.max(1)));

                Finding::new(
                    SourceTool::Security,
                    Self::map_severity(issue_severity, issue_confidence),
                    line,
                    test_id,
                    issue_text,
                )
            })
            .collect();

        Some(findings)
    }
}

impl Analyzer for BanditAnalyzer {
    fn name(&self) -> &'static str {
        "bandit"
    }

    fn tool(&self) -> SourceTool {
        SourceTool::Security
    }

    fn analyze(&self, code: &str, _filename: &str) -> AnalyzerOutput {
        if code.trim().is_empty() {
            return AnalyzerOutput::default();
        }

        let start = Instant::now();
        let snippet = match write_snippet(code) {
            Ok(file) => file,
            Err(e) => return AnalyzerOutput::unavailable(SourceTool::Security, e),
        };

        let cmd = vec![
            "bandit".to_string(),
            "-q".to_string(),
            "-f".to_string(),
            "json".to_string(),
            snippet.path().to_string_lossy().to_string(),
        ];

        let result = run_external_tool(&cmd, "bandit", self.timeout_secs);

        if result.timed_out {
            return AnalyzerOutput::unavailable(SourceTool::Security, "bandit timed out");
        }
        if let Some(error) = result.error {
            return AnalyzerOutput::unavailable(SourceTool::Security, error);
        }
        // bandit: 0 no issues, 1 issues found
        if !matches!(result.return_code, Some(0) | Some(1)) {
            return AnalyzerOutput::unavailable(SourceTool::Security, "bandit failed");
        }

        let total_lines = code.lines().count() as u32;
        let findings = match Self::parse_results(&result.stdout, total_lines) {
            Some(mut findings) => {
                findings.truncate(self.max_findings);
                findings
            }
            None => {
                debug!("Failed to parse bandit output: {}", result.stdout);
                return AnalyzerOutput::unavailable(
                    SourceTool::Security,
                    "unparseable bandit output",
                );
            }
        };

        info!("bandit reported {} findings", findings.len());
        AnalyzerOutput {
            findings,
            metrics: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
