//! In-process Python syntax checker
//!
//! Parses the snippet with rustpython-parser. A parse failure produces
//! exactly one critical finding; downstream scoring treats that as the
//! signal that no other metric is meaningful.

use crate::analyzers::base::{Analyzer, AnalyzerOutput};
use crate::models::{Finding, Severity, SourceTool};
use line_numbers::LinePositions;
use rustpython_parser::{parse, Mode};
use std::time::Instant;
use tracing::debug;

pub const SYNTAX_ERROR_CODE: &str = "syntax-error";

/// Syntax analyzer; the only adapter that runs no subprocess
#[derive(Debug, Default)]
pub struct SyntaxAnalyzer;

impl SyntaxAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for SyntaxAnalyzer {
    fn name(&self) -> &'static str {
        "syntax"
    }

    fn tool(&self) -> SourceTool {
        SourceTool::Syntax
    }

    fn analyze(&self, code: &str, filename: &str) -> AnalyzerOutput {
        if code.trim().is_empty() {
            return AnalyzerOutput::default();
        }

        let start = Instant::now();
        let findings = match parse(code, Mode::Module, filename) {
            Ok(_) => Vec::new(),
            Err(e) => {
                let line_positions = LinePositions::from(code);
                let offset = usize::from(e.offset).min(code.len().saturating_sub(1));
                let line = line_positions.from_offset(offset).as_usize() as u32 + 1;
                debug!("Syntax error at line {}: {}", line, e.error);
                vec![Finding::new(
                    SourceTool::Syntax,
                    Severity::Critical,
                    Some(line.min(code.lines().count().max(1) as u32)),
                    SYNTAX_ERROR_CODE,
                    format!("{}", e.error),
                )]
            }
        };

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
    fn test_valid_code_no_findings() {
        let out = SyntaxAnalyzer::new().analyze("def f():\n    pass\n", "snippet.py");
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_empty_code_no_findings() {
        let out = SyntaxAnalyzer::new().analyze("", "snippet.py");
        assert!(out.findings.is_empty());
        let out = SyntaxAnalyzer::new().analyze("   \n  ", "snippet.py");
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_parse_error_is_single_critical_finding() {
        let out = SyntaxAnalyzer::new().analyze("def f(:\n    pass\n", "snippet.py");
        assert_eq!(out.findings.len(), 1);
        let f = &out.findings[0];
        assert_eq!(f.severity, Severity::Critical);
        assert_eq!(f.tool, SourceTool::Syntax);
        assert_eq!(f.code, SYNTAX_ERROR_CODE);
        assert_eq!(f.line, Some(1));
    }

    #[test]
    fn test_error_line_within_snippet() {
        let code = "x = 1\ny = 2\ndef broken(:\n";
        let out = SyntaxAnalyzer::new().analyze(code, "snippet.py");
        assert_eq!(out.findings.len(), 1);
        let line = out.findings[0].line.expect("line");
        assert!(line >= 1 && line <= code.lines().count() as u32);
    }
}
