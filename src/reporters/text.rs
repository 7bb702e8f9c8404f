//! Text (terminal) reporter with colors and formatting

use crate::models::{Review, Severity};
use anyhow::Result;

/// Severity colors (ANSI escape codes)
fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m", // Red
        Severity::Error => "\x1b[91m",    // Light red
        Severity::Warning => "\x1b[33m",  // Yellow
        Severity::Info => "\x1b[90m",     // Gray
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::Error => "[E]",
        Severity::Warning => "[W]",
        Severity::Info => "[I]",
    }
}

fn score_color(score: u8) -> &'static str {
    match score {
        90..=100 => "\x1b[32m", // Green
        70..=89 => "\x1b[92m",  // Light green
        50..=69 => "\x1b[33m",  // Yellow
        _ => "\x1b[31m",        // Red
    }
}

fn format_score(label: &str, score: u8) -> String {
    format!("{label}: {}{score}{RESET}", score_color(score))
}

/// Render a review as formatted terminal output
pub fn render(review: &Review) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Critique Review{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!("{}\n\n", review.summary));

    out.push_str(&format!("{BOLD}SCORES{RESET}\n  "));
    out.push_str(&format_score("Readability", review.scores.readability));
    out.push_str("  ");
    out.push_str(&format_score("Complexity", review.scores.complexity));
    out.push_str("  ");
    out.push_str(&format_score("Security", review.scores.security));
    out.push_str("  ");
    out.push_str(&format_score("Testing", review.scores.testing));
    out.push_str("\n\n");

    if !review.findings.is_empty() {
        out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", review.findings.len()));
        for finding in &review.findings {
            let color = severity_color(&finding.severity);
            let line = finding
                .line
                .map(|l| format!("L{l}"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {color}{}{RESET} {:>4} {DIM}{}/{}{RESET} {}\n",
                severity_tag(&finding.severity),
                line,
                finding.tool,
                finding.code,
                finding.message
            ));
        }
        out.push('\n');
    }

    if !review.suggestions.is_empty() {
        out.push_str(&format!("{BOLD}SUGGESTIONS{RESET}\n"));
        for (i, suggestion) in review.suggestions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }
        out.push('\n');
    }

    if let Some(output) = &review.output {
        out.push_str(&format!("{BOLD}OUTPUT{RESET}\n"));
        for line in output.lines() {
            out.push_str(&format!("  {DIM}{line}{RESET}\n"));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_review;

    #[test]
    fn test_text_render_sections() {
        let rendered = render(&test_review()).expect("render text");
        assert!(rendered.contains("SCORES"));
        assert!(rendered.contains("FINDINGS"));
        assert!(rendered.contains("SUGGESTIONS"));
        assert!(rendered.contains("OUTPUT"));
        assert!(rendered.contains("security/B301"));
        assert!(rendered.contains("Readability"));
    }

    #[test]
    fn test_text_render_no_findings() {
        let mut review = test_review();
        review.findings.clear();
        review.output = None;
        let rendered = render(&review).expect("render text");
        assert!(!rendered.contains("FINDINGS"));
        assert!(!rendered.contains("OUTPUT"));
    }
}
