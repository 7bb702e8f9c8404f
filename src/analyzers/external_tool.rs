//! Utilities for adapters that wrap external tools
//!
//! External tool adapters follow a common pattern:
//! 1. Write the snippet to a temp file
//! 2. Run the tool as a subprocess with `std::process::Command`
//! 3. Parse JSON output
//! 4. Return standardized `Finding` objects

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Result from running an external tool
#[derive(Debug, Clone)]
pub struct ExternalToolResult {
    /// Whether the tool completed (may still have findings)
    pub success: bool,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Process exit code
    pub return_code: Option<i32>,
    /// Whether the tool timed out
    pub timed_out: bool,
    /// Error message if failed
    pub error: Option<String>,
}

impl ExternalToolResult {
    pub fn success(stdout: String, stderr: String, return_code: i32) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            return_code: Some(return_code),
            timed_out: false,
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: false,
            error: Some(error),
        }
    }

    pub fn timeout(tool_name: &str, timeout_secs: u64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: true,
            error: Some(format!("{} timed out after {}s", tool_name, timeout_secs)),
        }
    }

    /// Parse stdout as JSON
    pub fn json_output(&self) -> Option<serde_json::Value> {
        if self.stdout.is_empty() {
            return None;
        }
        serde_json::from_str(&self.stdout).ok()
    }
}

/// Write the submitted snippet to a temp file the tools can read.
///
/// The `.py` suffix matters: ruff and bandit key their behavior off it.
pub fn write_snippet(code: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".py").tempfile()?;
    file.write_all(code.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Run an external tool with standard error handling
///
/// # Arguments
/// * `cmd` - Command and arguments to run
/// * `tool_name` - Human-readable tool name for error messages
/// * `timeout_secs` - Timeout in seconds (0 = no timeout)
pub fn run_external_tool(cmd: &[String], tool_name: &str, timeout_secs: u64) -> ExternalToolResult {
    if cmd.is_empty() {
        return ExternalToolResult::failure("Empty command".to_string());
    }

    let program = &cmd[0];
    let args = &cmd[1..];

    debug!("Running {}: {} {:?}", tool_name, program, args);

    let mut command = Command::new(program);
    command.args(args);
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                return ExternalToolResult::failure(format!("{} not installed", tool_name));
            }
            return ExternalToolResult::failure(format!("failed to run {}: {}", tool_name, e));
        }
    };

    if timeout_secs > 0 {
        run_with_timeout(child, tool_name, timeout_secs)
    } else {
        run_without_timeout(child, tool_name)
    }
}

fn run_without_timeout(child: std::process::Child, tool_name: &str) -> ExternalToolResult {
    let output = match child.wait_with_output() {
        Ok(output) => output,
        Err(e) => {
            return ExternalToolResult::failure(format!("failed to wait for {}: {}", tool_name, e));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let return_code = output.status.code().unwrap_or(-1);

    ExternalToolResult::success(stdout, stderr, return_code)
}

/// Run process with timeout, polling for completion
fn run_with_timeout(
    mut child: std::process::Child,
    tool_name: &str,
    timeout_secs: u64,
) -> ExternalToolResult {
    let start = Instant::now();
    let timeout = Duration::from_secs(timeout_secs);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(|s| {
                        BufReader::new(s)
                            .lines()
                            .map_while(Result::ok)
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();

                let stderr = child
                    .stderr
                    .take()
                    .map(|s| {
                        BufReader::new(s)
                            .lines()
                            .map_while(Result::ok)
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .unwrap_or_default();

                return ExternalToolResult::success(stdout, stderr, status.code().unwrap_or(-1));
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    warn!("{} timed out after {}s", tool_name, timeout_secs);
                    return ExternalToolResult::timeout(tool_name, timeout_secs);
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return ExternalToolResult::failure(format!(
                    "failed to wait for {}: {}",
                    tool_name, e
                ));
            }
        }
    }
}

/// Check if a tool is installed
pub fn is_tool_installed(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check if a Python tool is installed (directly or via `python -m`)
pub fn is_python_tool_installed(tool: &str) -> bool {
    if is_tool_installed(tool) {
        return true;
    }

    Command::new("python")
        .args(["-m", tool, "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_tool_result() {
        let result = ExternalToolResult::success("output".into(), "".into(), 0);
        assert!(result.success);
        assert_eq!(result.stdout, "output");

        let result = ExternalToolResult::failure("error".into());
        assert!(!result.success);
        assert_eq!(result.error, Some("error".into()));

        let result = ExternalToolResult::timeout("test", 60);
        assert!(result.timed_out);
    }

    #[test]
    fn test_json_parsing() {
        let result = ExternalToolResult::success(r#"{"key": "value"}"#.into(), "".into(), 0);
        let json = result.json_output().expect("json");
        assert_eq!(json["key"], "value");
    }

    #[test]
    fn test_missing_binary_is_failure_not_panic() {
        let cmd = vec!["definitely-not-a-real-tool-xyz".to_string()];
        let result = run_external_tool(&cmd, "definitely-not-a-real-tool-xyz", 5);
        assert!(!result.success);
        assert!(result.error.expect("error").contains("not installed"));
    }

    #[test]
    fn test_write_snippet_has_py_suffix() {
        let file = write_snippet("print('hi')\n").expect("temp file");
        let path = file.path().to_string_lossy().to_string();
        assert!(path.ends_with(".py"));
        assert_eq!(
            std::fs::read_to_string(file.path()).expect("read back"),
            "print('hi')\n"
        );
    }
}
