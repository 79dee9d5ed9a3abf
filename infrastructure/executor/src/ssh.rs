use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use business::domain::execution::errors::ExecutionError;
use business::domain::execution::executor::RemoteExecutor;
use business::domain::execution::model::{ExecutionOutput, ShellInput, ShellJob};

use crate::process::{run_with_deadline, write_script};

/// SSH transport settings. `script_dir` is the scratch directory used for
/// pushed scripts, assumed to exist on both ends under the same path.
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub user: String,
    pub options: String,
    pub shell: String,
    pub timeout: Duration,
    pub script_dir: PathBuf,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            options: "-o StrictHostKeyChecking=no".to_string(),
            shell: "sh".to_string(),
            timeout: Duration::from_secs(60),
            script_dir: std::env::temp_dir(),
        }
    }
}

/// Runs shell jobs on remote hosts by shelling out to `ssh`/`scp`.
///
/// Commands are passed as a single argument, so the remote login shell does
/// the word splitting. Scripts are written locally, copied over with `scp`,
/// executed, and removed on both ends.
pub struct SshRemoteExecutor {
    config: SshConfig,
}

impl SshRemoteExecutor {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    fn target(&self, host: &str) -> String {
        format!("{}@{}", self.config.user, host)
    }

    fn option_args(&self) -> Vec<String> {
        self.config
            .options
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn ssh_args(&self, host: &str, command: &str) -> Vec<String> {
        let mut args = self.option_args();
        args.push(self.target(host));
        args.push(command.to_string());
        args
    }

    fn scp_push_args(&self, host: &str, remote_target: &str, local_files: &[PathBuf]) -> Vec<String> {
        let mut args = self.option_args();
        for file in local_files {
            args.push(file.display().to_string());
        }
        args.push(format!("{}:{}", self.target(host), remote_target));
        args
    }

    fn scp_pull_args(&self, host: &str, local_target: &Path, remote_files: &[String]) -> Vec<String> {
        let mut args = self.option_args();
        for file in remote_files {
            args.push(format!("{}:{}", self.target(host), file));
        }
        args.push(local_target.display().to_string());
        args
    }

    async fn run_ssh(
        &self,
        host: &str,
        command: &str,
        timeout: Duration,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let mut ssh = Command::new("ssh");
        ssh.args(self.ssh_args(host, command));
        classify_remote(run_with_deadline(ssh, timeout).await?)
    }

    /// Copies local files to `remote_target` on the host. No files, no-op.
    pub async fn push_files(
        &self,
        host: &str,
        remote_target: &str,
        local_files: &[PathBuf],
    ) -> Result<(), ExecutionError> {
        if local_files.is_empty() {
            return Ok(());
        }

        let mut scp = Command::new("scp");
        scp.args(self.scp_push_args(host, remote_target, local_files));
        let output = run_with_deadline(scp, self.config.timeout).await?;
        transfer_result(output)
    }

    /// Copies remote files from the host into `local_target`. No files, no-op.
    pub async fn pull_files(
        &self,
        host: &str,
        local_target: &Path,
        remote_files: &[String],
    ) -> Result<(), ExecutionError> {
        if remote_files.is_empty() {
            return Ok(());
        }

        let mut scp = Command::new("scp");
        scp.args(self.scp_pull_args(host, local_target, remote_files));
        let output = run_with_deadline(scp, self.config.timeout).await?;
        transfer_result(output)
    }

    async fn run_script_on(
        &self,
        host: &str,
        job: &ShellJob,
        content: &str,
        timeout: Duration,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let path = write_script(&self.config.script_dir, content).await?;
        let remote_path = path.display().to_string();

        let result = match self.push_files(host, &remote_path, &[path.clone()]).await {
            Ok(()) => {
                let shell = job.shell.as_deref().unwrap_or(&self.config.shell);
                self.run_ssh(host, &format!("{} {}", shell, remote_path), timeout)
                    .await
            }
            Err(err) => Err(err),
        };

        // Both cleanups are best effort.
        let _ = self
            .run_ssh(host, &format!("rm -f {}", remote_path), self.config.timeout)
            .await;
        let _ = tokio::fs::remove_file(&path).await;

        result
    }
}

fn classify_remote(output: std::process::Output) -> Result<ExecutionOutput, ExecutionError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        return Ok(ExecutionOutput { stdout, stderr });
    }

    // ssh reserves 255 for its own failures; everything else is the remote
    // command's exit code.
    match output.status.code() {
        Some(255) => Err(ExecutionError::Transport {
            reason: if stderr.trim().is_empty() {
                "ssh exited with 255".to_string()
            } else {
                stderr.trim().to_string()
            },
        }),
        code => Err(ExecutionError::CommandFailed {
            code,
            stdout,
            stderr,
        }),
    }
}

fn transfer_result(output: std::process::Output) -> Result<(), ExecutionError> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ExecutionError::Transport {
        reason: if stderr.trim().is_empty() {
            format!("scp exited with {:?}", output.status.code())
        } else {
            stderr.trim().to_string()
        },
    })
}

#[async_trait]
impl RemoteExecutor for SshRemoteExecutor {
    async fn run_on(&self, host: &str, job: &ShellJob) -> Result<ExecutionOutput, ExecutionError> {
        let timeout = job.timeout.unwrap_or(self.config.timeout);

        match &job.input {
            ShellInput::Command(cmd) => self.run_ssh(host, cmd, timeout).await,
            ShellInput::Script(content) => self.run_script_on(host, job, content, timeout).await,
        }
    }
}
