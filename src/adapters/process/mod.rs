// Process runner - shared spawning for external tool adapters

use std::io;
use std::process::Output;

use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;

/// Run `program` with `args`, wait for exit and capture stdout and stderr.
///
/// Launch failures (binary missing, not executable) become
/// `ToolUnavailable`; the exit status is left for the caller to judge.
pub async fn run_captured(program: &str, args: &[String]) -> Result<Output, DomainError> {
    debug!(program, ?args, "Spawning external tool");

    Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| launch_error(program, e))
}

/// Run `program <version_flag>` and return the first line it prints
pub async fn probe_version(program: &str, version_flag: &str) -> Result<String, DomainError> {
    let output = run_captured(program, &[version_flag.to_string()]).await?;
    if !output.status.success() {
        return Err(DomainError::tool_unavailable(
            program,
            format!(
                "'{} {}' exited with {}",
                program, version_flag, output.status
            ),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
}

fn launch_error(program: &str, error: io::Error) -> DomainError {
    let message = match error.kind() {
        io::ErrorKind::NotFound => "not found on PATH".to_string(),
        io::ErrorKind::PermissionDenied => "not executable".to_string(),
        _ => format!("failed to launch: {}", error),
    };
    DomainError::tool_unavailable(program, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_tool_unavailable() {
        let err = run_captured("definitely-not-a-real-tool-7f3a", &[])
            .await
            .unwrap_err();
        match err {
            DomainError::ToolUnavailable { tool, message } => {
                assert_eq!(tool, "definitely-not-a-real-tool-7f3a");
                assert_eq!(message, "not found on PATH");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
