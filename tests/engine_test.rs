//! Integration tests for the aggregation engine
//!
//! These use stub analyzers so no external tool needs to be installed:
//! - Deduplication across adapters
//! - Merge order independent of adapter completion order
//! - Syntax failure forcing all scores to zero
//! - End-to-end review of a trivial valid snippet

use critique::aggregator::Engine;
use critique::analyzers::{Analyzer, AnalyzerOutput, SyntaxAnalyzer};
use critique::config::AppConfig;
use critique::models::{Finding, Severity, SourceTool};
use std::sync::Arc;
use std::time::Duration;

/// Analyzer that returns canned findings, optionally after a delay
struct StaticAnalyzer {
    name: &'static str,
    tool: SourceTool,
    findings: Vec<Finding>,
    delay: Duration,
}

impl StaticAnalyzer {
    fn new(name: &'static str, tool: SourceTool, findings: Vec<Finding>) -> Self {
        Self {
            name,
            tool,
            findings,
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Analyzer for StaticAnalyzer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn tool(&self) -> SourceTool {
        self.tool
    }

    fn analyze(&self, _code: &str, _filename: &str) -> AnalyzerOutput {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        AnalyzerOutput::findings(self.findings.clone())
    }
}

fn lint_finding(code: &str, line: u32, message: &str) -> Finding {
    Finding::new(SourceTool::Lint, Severity::Warning, Some(line), code, message)
}

#[test]
fn duplicate_findings_collapse_to_first_seen() {
    let config = AppConfig::default();
    let duplicate = lint_finding("E501", 3, "reported twice");

    let engine = Engine::with_analyzers(
        &config,
        vec![
            Arc::new(StaticAnalyzer::new(
                "first",
                SourceTool::Lint,
                vec![duplicate.clone()],
            )),
            Arc::new(StaticAnalyzer::new(
                "second",
                SourceTool::Lint,
                vec![duplicate.clone(), lint_finding("E501", 7, "other line")],
            )),
        ],
    );

    let review = engine.review("x = 1\n", "snippet.py").expect("review");
    let e501: Vec<_> = review.findings.iter().filter(|f| f.code == "E501").collect();
    assert_eq!(e501.len(), 2);
    assert_eq!(e501[0].line, Some(3));
    assert_eq!(e501[1].line, Some(7));
}

#[test]
fn merge_is_independent_of_completion_order() {
    let config = AppConfig::default();
    let fast = lint_finding("F401", 1, "unused import");
    let slow = Finding::new(SourceTool::Security, Severity::Error, Some(2), "B301", "pickle");

    // Slow adapter registered first: its findings must still merge first
    let engine_slow_first = Engine::with_analyzers(
        &config,
        vec![
            Arc::new(
                StaticAnalyzer::new("security", SourceTool::Security, vec![slow.clone()])
                    .with_delay(Duration::from_millis(150)),
            ),
            Arc::new(StaticAnalyzer::new("lint", SourceTool::Lint, vec![fast.clone()])),
        ],
    );
    let engine_fast_first = Engine::with_analyzers(
        &config,
        vec![
            Arc::new(StaticAnalyzer::new("security", SourceTool::Security, vec![slow])),
            Arc::new(
                StaticAnalyzer::new("lint", SourceTool::Lint, vec![fast])
                    .with_delay(Duration::from_millis(150)),
            ),
        ],
    );

    let review_a = engine_slow_first.review("x = 1\n", "snippet.py").expect("review");
    let review_b = engine_fast_first.review("x = 1\n", "snippet.py").expect("review");

    let ids_a: Vec<&str> = review_a.findings.iter().map(|f| f.id.as_str()).collect();
    let ids_b: Vec<&str> = review_b.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
    // Stable order puts the error before the warning regardless of timing
    assert_eq!(review_a.findings[0].code, "B301");
}

#[test]
fn unparseable_code_zeroes_all_scores() {
    let config = AppConfig::default();
    let engine = Engine::with_analyzers(&config, vec![Arc::new(SyntaxAnalyzer::new())]);

    let review = engine
        .review("def broken(:\n    pass\n", "snippet.py")
        .expect("review");

    assert_eq!(review.scores.as_array(), [0, 0, 0, 0]);
    assert_eq!(review.findings.len(), 1);
    assert_eq!(review.findings[0].severity, Severity::Critical);
    assert_eq!(review.findings[0].tool, SourceTool::Syntax);
    assert!(review
        .suggestions
        .iter()
        .any(|s| s.contains("syntax error")));
}

#[test]
fn trivial_valid_snippet_end_to_end() {
    let config = AppConfig::default();
    let engine = Engine::with_analyzers(&config, vec![Arc::new(SyntaxAnalyzer::new())]);

    let review = engine.review("def f():\n  pass\n", "snippet.py").expect("review");

    assert_eq!(review.scores.security, 100);
    assert!(review.findings.iter().all(|f| f.severity != Severity::Critical));
    for score in review.scores.as_array() {
        assert!(score <= 100);
    }
    // Nothing to fix, but the review still says something actionable
    assert!(!review.suggestions.is_empty());
    assert!(!review.summary.is_empty());
}

#[test]
fn unavailable_tool_degrades_gracefully() {
    let config = AppConfig::default();
    let engine = Engine::with_analyzers(
        &config,
        vec![
            Arc::new(SyntaxAnalyzer::new()),
            Arc::new(StaticAnalyzer::new(
                "security",
                SourceTool::Security,
                vec![Finding::unavailable(SourceTool::Security, "bandit not installed")],
            )),
        ],
    );

    let review = engine.review("x = 1\n", "snippet.py").expect("review");

    // The outage is visible as a finding but does not hurt the scores
    assert!(review.findings.iter().any(|f| f.is_unavailable()));
    assert_eq!(review.scores.security, 100);
    assert!(review
        .suggestions
        .iter()
        .any(|s| s.contains("bandit not installed")));
}

#[test]
fn findings_capped_at_configured_maximum() {
    let mut config = AppConfig::default();
    config.analysis.max_findings = 5;

    let findings: Vec<Finding> = (0..20)
        .map(|i| lint_finding(&format!("W{i:03}"), i + 1, "style"))
        .collect();
    let engine = Engine::with_analyzers(
        &config,
        vec![Arc::new(StaticAnalyzer::new("lint", SourceTool::Lint, findings))],
    );

    let review = engine.review("x = 1\n", "snippet.py").expect("review");
    assert_eq!(review.findings.len(), 5);
}
