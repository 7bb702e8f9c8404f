//! Radon-based complexity adapter
//!
//! Collects the maintainability index and cyclomatic complexity via the
//! radon CLI. The metrics ride along as auxiliary structural data for the
//! scorer; only functions above the complexity threshold become findings.

use crate::analyzers::base::{Analyzer, AnalyzerOutput};
use crate::analyzers::external_tool::{run_external_tool, write_snippet, ExternalToolResult};
use crate::models::{Finding, Severity, SourceTool, StructuralMetrics};
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, info};

pub const HIGH_CC_CODE: &str = "high-cc";

/// Radon complexity analyzer
pub struct RadonAnalyzer {
    timeout_secs: u64,
    cc_warn_threshold: f64,
}

impl RadonAnalyzer {
    pub fn new(timeout_secs: u64, cc_warn_threshold: f64) -> Self {
        Self {
            timeout_secs,
            cc_warn_threshold,
        }
    }

    fn run_radon(&self, subcommand: &[&str], path: &str) -> ExternalToolResult {
        let mut cmd = vec!["radon".to_string()];
        cmd.extend(subcommand.iter().map(|s| s.to_string()));
        cmd.push(path.to_string());
        run_external_tool(&cmd, "radon", self.timeout_secs)
    }

    /// Parse `radon mi -j` output for the analyzed path
    fn parse_mi(stdout: &str, path: &str) -> Option<f64> {
        let data: JsonValue = serde_json::from_str(stdout).ok()?;
        let entry = data.get(path)?;
        // radon emits either {"mi": ...} or a bare number depending on version
        match entry {
            JsonValue::Object(obj) => obj.get("mi").and_then(|v| v.as_f64()),
            JsonValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Parse `radon cc -s -j` output into (name, complexity, lineno) entries
    fn parse_cc(stdout: &str, path: &str) -> Option<Vec<(String, f64, u32)>> {
        let data: JsonValue = serde_json::from_str(stdout).ok()?;
        let entries = data.get(path)?.as_array()?;

        Some(
            entries
                .iter()
                .filter_map(|e| {
                    let complexity = e.get("complexity")?.as_f64()?;
                    let name = e
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<anonymous>")
                        .to_string();
                    let lineno = e.get("lineno").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
                    Some((name, complexity, lineno))
                })
                .collect(),
        )
    }

    fn metrics_from(mi: Option<f64>, cc_entries: &[(String, f64, u32)]) -> StructuralMetrics {
        let (avg, max) = if cc_entries.is_empty() {
            (Some(0.0), Some(0.0))
        } else {
            let sum: f64 = cc_entries.iter().map(|(_, c, _)| c).sum();
            let max = cc_entries
                .iter()
                .map(|(_, c, _)| *c)
                .fold(f64::MIN, f64::max);
            (Some(sum / cc_entries.len() as f64), Some(max))
        };

        StructuralMetrics {
            maintainability_index: mi,
            avg_complexity: avg,
            max_complexity: max,
        }
    }
}

impl Analyzer for RadonAnalyzer {
    fn name(&self) -> &'static str {
        "radon"
    }

    fn tool(&self) -> SourceTool {
        SourceTool::Complexity
    }

    fn analyze(&self, code: &str, _filename: &str) -> AnalyzerOutput {
        if code.trim().is_empty() {
            return AnalyzerOutput::default();
        }

        let start = Instant::now();
        let snippet = match write_snippet(code) {
            Ok(file) => file,
            Err(e) => return AnalyzerOutput::unavailable(SourceTool::Complexity, e),
        };
        let path = snippet.path().to_string_lossy().to_string();

        let mi_result = self.run_radon(&["mi", "-j"], &path);
        if let Some(error) = &mi_result.error {
            return AnalyzerOutput::unavailable(SourceTool::Complexity, error);
        }
        if mi_result.timed_out {
            return AnalyzerOutput::unavailable(SourceTool::Complexity, "radon timed out");
        }

        let cc_result = self.run_radon(&["cc", "-s", "-j"], &path);
        if cc_result.timed_out {
            return AnalyzerOutput::unavailable(SourceTool::Complexity, "radon timed out");
        }

        let mi = Self::parse_mi(&mi_result.stdout, &path);
        let cc_entries = Self::parse_cc(&cc_result.stdout, &path).unwrap_or_default();
        if mi.is_none() && cc_entries.is_empty() {
            debug!("radon produced no usable metrics");
        }

        let total_lines = code.lines().count() as u32;
        let findings = cc_entries
            .iter()
            .filter(|(_, complexity, _)| *complexity > self.cc_warn_threshold)
            .map(|(name, complexity, lineno)| {
                let line = (*lineno > 0).then(|| (*lineno).clamp(1, total_lines.max(1)));
                Finding::new(
                    SourceTool::Complexity,
                    Severity::Warning,
                    line,
                    HIGH_CC_CODE,
                    format!(
                        "{} has cyclomatic complexity {:.0} (threshold {:.0})",
                        name, complexity, self.cc_warn_threshold
                    ),
                )
            })
            .collect::<Vec<_>>();

        info!(
            "radon: mi={:?}, {} functions, {} above threshold",
            mi,
            cc_entries.len(),
            findings.len()
        );

        AnalyzerOutput {
            findings,
            metrics: Some(Self::metrics_from(mi, &cc_entries)),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mi() {
        let stdout = r#"{"/tmp/x.py": {"mi": 87.3, "rank": "A"}}"#;
        assert_eq!(RadonAnalyzer::parse_mi(stdout, "/tmp/x.py"), Some(87.3));
        assert_eq!(RadonAnalyzer::parse_mi(stdout, "/tmp/other.py"), None);

        let bare = r#"{"/tmp/x.py": 64.0}"#;
        assert_eq!(RadonAnalyzer::parse_mi(bare, "/tmp/x.py"), Some(64.0));
    }

    #[test]
    fn test_parse_cc() {
        let stdout = r#"{"/tmp/x.py": [
            {"type": "function", "name": "f", "complexity": 3, "lineno": 1},
            {"type": "function", "name": "g", "complexity": 12, "lineno": 9}
        ]}"#;
        let entries = RadonAnalyzer::parse_cc(stdout, "/tmp/x.py").expect("parse");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], ("g".to_string(), 12.0, 9));
    }

    #[test]
    fn test_metrics_from_empty_is_zero_cc() {
        let metrics = RadonAnalyzer::metrics_from(Some(70.0), &[]);
        assert_eq!(metrics.avg_complexity, Some(0.0));
        assert_eq!(metrics.max_complexity, Some(0.0));
        assert_eq!(metrics.maintainability_index, Some(70.0));
    }

    #[test]
    fn test_metrics_from_entries() {
        let entries = vec![
            ("f".to_string(), 2.0, 1),
            ("g".to_string(), 6.0, 10),
        ];
        let metrics = RadonAnalyzer::metrics_from(None, &entries);
        assert_eq!(metrics.avg_complexity, Some(4.0));
        assert_eq!(metrics.max_complexity, Some(6.0));
        assert_eq!(metrics.maintainability_index, None);
    }
}
