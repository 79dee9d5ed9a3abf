use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use business::domain::execution::errors::ExecutionError;

/// Runs a prepared command, captures its output, and enforces the deadline.
/// A zero `timeout` disables the deadline. The child is killed when the
/// deadline fires.
pub async fn run_with_deadline(
    mut command: Command,
    timeout: Duration,
) -> Result<Output, ExecutionError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let work = command.output();
    let result = if timeout.is_zero() {
        work.await
    } else {
        match tokio::time::timeout(timeout, work).await {
            Ok(result) => result,
            Err(_) => return Err(ExecutionError::Timeout { limit: timeout }),
        }
    };

    result.map_err(|err| ExecutionError::Launch {
        reason: err.to_string(),
    })
}

/// Content-addressed script file name, so identical scripts reuse one file
/// and concurrent distinct scripts never collide.
pub fn script_file_name(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("agent_script_{hex}.sh")
}

/// Writes the script into `dir` under its content-addressed name, created
/// owner-only (0700), and returns the full path.
pub async fn write_script(dir: &Path, content: &str) -> Result<PathBuf, ExecutionError> {
    let path = dir.join(script_file_name(content));
    let launch = |err: std::io::Error| ExecutionError::Launch {
        reason: format!("{}: {}", path.display(), err),
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o700);

    let mut file = options.open(&path).await.map_err(launch)?;
    file.write_all(content.as_bytes()).await.map_err(launch)?;
    file.flush().await.map_err(launch)?;

    Ok(path)
}
