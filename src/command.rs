//! Subprocess execution for external packaging tools
//!
//! All external invocations go through `run_command`: a discrete argument
//! vector handed to the OS, never a shell-interpolated string. Decompiled
//! artifacts can emit arbitrary bytes, so output capture is lossy UTF-8.

use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{ApktoolError, Result};

/// Run an external program and return its captured output.
///
/// On success, stdout is returned, falling back to stderr when stdout is
/// empty (apktool writes most of its progress to stderr). A non-zero exit
/// fails with the joined command line and the captured error stream; a
/// spawn failure is reported separately so a missing executable is
/// distinguishable from a failing one.
pub async fn run_command(
    program: &str,
    args: &[String],
    cwd: &Path,
    timeout: Duration,
) -> Result<String> {
    let cmdline = command_line(program, args);
    debug!("Running: {cmdline}");

    let fut = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output();

    let output = match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(|e| classify_spawn_error(program, &cmdline, e))?,
        Err(_) => {
            return Err(ApktoolError::CommandTimeout {
                seconds: timeout.as_secs(),
                command: cmdline,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let detail = if stderr.trim().is_empty() { &stdout } else { &stderr };
        return Err(ApktoolError::CommandFailed(format!(
            "{}\n{}",
            cmdline,
            detail.trim_end()
        )));
    }

    if stdout.is_empty() {
        Ok(stderr)
    } else {
        Ok(stdout)
    }
}

/// Probe whether an external tool can be invoked at all.
///
/// Used once at startup for a non-fatal warning; individual tool calls
/// still report their own errors.
pub async fn tool_available(program: &str) -> bool {
    match Command::new(program).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

fn classify_spawn_error(program: &str, display: &str, err: io::Error) -> ApktoolError {
    if err.kind() == io::ErrorKind::NotFound {
        ApktoolError::CommandNotFound(program.to_string())
    } else {
        ApktoolError::SpawnFailed(format!("{}: {}", display, err))
    }
}

fn command_line(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_command_captures_stdout() {
        let out = run_command("echo", &args(&["hello"]), Path::new("/tmp"), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_missing_executable_is_command_not_found() {
        let err = run_command(
            "definitely-not-a-real-binary-xyz",
            &args(&[]),
            Path::new("/tmp"),
            TIMEOUT,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApktoolError::CommandNotFound(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_command_failed_with_stderr() {
        let err = run_command(
            "sh",
            &args(&["-c", "echo boom >&2; exit 3"]),
            Path::new("/tmp"),
            TIMEOUT,
        )
        .await
        .unwrap_err();
        match err {
            ApktoolError::CommandFailed(msg) => {
                assert!(msg.contains("boom"));
                assert!(msg.contains("sh"));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_falls_back_to_stdout_when_stderr_empty() {
        let err = run_command(
            "sh",
            &args(&["-c", "echo only-stdout; exit 1"]),
            Path::new("/tmp"),
            TIMEOUT,
        )
        .await
        .unwrap_err();
        match err {
            ApktoolError::CommandFailed(msg) => assert!(msg.contains("only-stdout")),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_falls_back_to_stderr_when_stdout_empty() {
        let out = run_command(
            "sh",
            &args(&["-c", "echo progress >&2"]),
            Path::new("/tmp"),
            TIMEOUT,
        )
        .await
        .unwrap();
        assert_eq!(out.trim(), "progress");
    }

    #[tokio::test]
    async fn test_arguments_stay_discrete_no_shell_interpretation() {
        // A value with spaces and a semicolon must arrive in the child's
        // argv as one argument, untouched by any shell.
        let tricky = "a b;rm -rf /tmp/nope".to_string();
        let out = run_command("echo", &[tricky.clone()], Path::new("/tmp"), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(out.trim(), tricky);
    }

    #[tokio::test]
    async fn test_non_utf8_output_is_decoded_lossily() {
        let out = run_command(
            "sh",
            &args(&["-c", "printf 'ok\\377bytes'"]),
            Path::new("/tmp"),
            TIMEOUT,
        )
        .await
        .unwrap();
        assert!(out.contains("ok"));
        assert!(out.contains("bytes"));
    }

    #[tokio::test]
    async fn test_hung_command_times_out() {
        let err = run_command(
            "sleep",
            &args(&["30"]),
            Path::new("/tmp"),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApktoolError::CommandTimeout { .. }));
    }

    #[tokio::test]
    async fn test_tool_available() {
        assert!(tool_available("sh").await || tool_available("echo").await);
        assert!(!tool_available("definitely-not-a-real-binary-xyz").await);
    }
}
