//! Execution-output capture
//!
//! Runs the submitted snippet and captures stdout/stderr so the caller can
//! show program output. The result is surfaced only as `Review.output`,
//! never merged into findings. Sandboxing belongs to the process layer that
//! hosts this crate; here the run is only timeboxed.

use crate::analyzers::external_tool::{run_external_tool, write_snippet};

/// Run the snippet with `python` and capture its combined output.
///
/// Stderr lines are prefixed with `ERR:`; a silent run yields
/// `"(no output)"`. Failures to launch are reported in-band as text.
pub fn run_snippet(code: &str, timeout_secs: u64) -> String {
    let snippet = match write_snippet(code) {
        Ok(file) => file,
        Err(e) => return format!("Runtime error: {e}"),
    };

    let cmd = vec![
        "python".to_string(),
        snippet.path().to_string_lossy().to_string(),
    ];
    let result = run_external_tool(&cmd, "python", timeout_secs);

    if result.timed_out {
        return format!("Runtime error: execution timed out after {timeout_secs}s");
    }
    if let Some(error) = result.error {
        return format!("Runtime error: {error}");
    }

    let mut pieces = Vec::new();
    if !result.stdout.trim().is_empty() {
        pieces.push(result.stdout.trim().to_string());
    }
    if !result.stderr.trim().is_empty() {
        pieces.push(format!("ERR: {}", result.stderr.trim()));
    }

    if pieces.is_empty() {
        "(no output)".to_string()
    } else {
        pieces.join("\n")
    }
}
