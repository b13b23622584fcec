//! Running external media tools.
//!
//! Every invocation has a deadline. The child is spawned with `kill_on_drop`, so
//! an elapsed timeout or a cancelled caller future terminates the process.

use std::ffi::OsStr;
use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;

/// Errors from spawning or waiting on an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} not found at '{path}'")]
    NotFound { tool: &'static str, path: String },

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} timed out after {}s", timeout.as_secs())]
    Timeout { tool: &'static str, timeout: Duration },

    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },
}

/// Run `program` with `args` and return its stdout on a zero exit status.
///
/// `tool` is the logical name used in errors and logs (e.g. "ffprobe"), while
/// `program` is the configured executable path.
pub async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    timeout: Duration,
) -> Result<Vec<u8>, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start = Instant::now();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ToolError::NotFound {
                tool,
                path: program.to_string(),
            })
        }
        Ok(Err(source)) => return Err(ToolError::Spawn { tool, source }),
        Err(_) => {
            tracing::warn!(
                tool = tool,
                timeout_secs = timeout.as_secs(),
                "External tool timed out, process killed"
            );
            return Err(ToolError::Timeout { tool, timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(
            tool = tool,
            status = %output.status,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "External tool exited with failure"
        );
        return Err(ToolError::Failed {
            tool,
            status: output.status.to_string(),
            stderr,
        });
    }

    tracing::debug!(
        tool = tool,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        stdout_bytes = output.stdout.len(),
        "External tool completed"
    );

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let err = run_tool(
            "ffprobe",
            "/nonexistent/bin/ffprobe-tubely",
            ["-version"],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { tool: "ffprobe", .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout() {
        let stdout = run_tool("sh", "sh", ["-c", "printf hello"], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(stdout, b"hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_reports_stderr() {
        let err = run_tool(
            "sh",
            "sh",
            ["-c", "echo broken >&2; exit 3"],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        match err {
            ToolError::Failed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_tool_times_out() {
        let start = Instant::now();
        let err = run_tool("sh", "sh", ["-c", "sleep 10"], Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
