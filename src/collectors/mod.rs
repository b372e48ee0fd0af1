pub mod host;
pub mod logs;
pub mod processes;
pub mod schedule;

use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("{command} wrote to stderr: {stderr}")]
    CommandStderr { command: String, stderr: String },
    #[error("could not parse process manager output: {0}")]
    ProcessList(#[from] serde_json::Error),
}

/// Runs one external command and captures its stdout. With
/// `fail_on_stderr`, any stderr output fails the call even on a zero exit
/// (crontab and journalctl report problems that way).
pub(crate) async fn run_capture(
    program: &str,
    args: &[&str],
    fail_on_stderr: bool,
) -> Result<String, CollectorError> {
    let command = if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    };

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| CollectorError::Spawn {
            command: command.clone(),
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(CollectorError::CommandFailed {
            command,
            status: output.status,
            stderr,
        });
    }
    if fail_on_stderr && !stderr.is_empty() {
        return Err(CollectorError::CommandStderr { command, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
