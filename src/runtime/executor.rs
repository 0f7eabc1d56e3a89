use super::JdkToolsError;
use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn execute_command(
    tool: impl AsRef<OsStr>,
    args: &[&str],
    timeout_duration: Option<Duration>,
) -> Result<Output, JdkToolsError> {
    let tool = tool.as_ref();
    let timeout_duration = timeout_duration.unwrap_or(DEFAULT_TIMEOUT);
    let command_line = format!("{} {}", tool.to_string_lossy(), args.join(" "));

    let command = Command::new(tool).args(args).kill_on_drop(true).output();

    let output = timeout(timeout_duration, command)
        .await
        .map_err(|_| JdkToolsError::Timeout {
            command: command_line.clone(),
        })?
        .map_err(|e| JdkToolsError::ExecutionFailed {
            command: command_line.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(JdkToolsError::CommandFailed {
            command: command_line,
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_successful_command_returns_output() {
        let output = assert_ok!(execute_command("echo", &["GC.run"], None).await);
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "GC.run");
    }

    #[tokio::test]
    async fn test_missing_tool_is_execution_failure() {
        let result = execute_command("gc-pulse-no-such-tool", &[], None).await;
        assert!(matches!(result, Err(JdkToolsError::ExecutionFailed { .. })));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let err = assert_err!(execute_command("false", &[], None).await);
        assert!(matches!(err, JdkToolsError::CommandFailed { status: 1, .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let result = execute_command("sleep", &["5"], Some(Duration::from_millis(50))).await;
        assert!(matches!(result, Err(JdkToolsError::Timeout { .. })));
    }
}
