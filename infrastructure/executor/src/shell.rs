use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use business::domain::execution::errors::ExecutionError;
use business::domain::execution::executor::ShellExecutor;
use business::domain::execution::model::{ExecutionOutput, ShellInput, ShellJob};

use crate::process::{run_with_deadline, write_script};

/// Executor-side defaults, applied when a job carries no overrides.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub shell: String,
    pub timeout: Duration,
    pub script_dir: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            timeout: Duration::from_secs(60),
            script_dir: std::env::temp_dir(),
        }
    }
}

/// Runs shell jobs on the local host via child processes.
///
/// Commands run as `<shell> -c <cmd>`; scripts are materialized in the
/// scratch directory, run as `<shell> <file>`, and removed afterwards.
pub struct ProcessShellExecutor {
    config: ShellConfig,
}

impl ProcessShellExecutor {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    fn effective_shell<'a>(&'a self, job: &'a ShellJob) -> &'a str {
        job.shell.as_deref().unwrap_or(&self.config.shell)
    }

    fn effective_timeout(&self, job: &ShellJob) -> Duration {
        job.timeout.unwrap_or(self.config.timeout)
    }

    async fn run_command(
        &self,
        shell: &str,
        timeout: Duration,
        cmd: &str,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let mut command = Command::new(shell);
        command.arg("-c").arg(cmd);
        classify(run_with_deadline(command, timeout).await?)
    }

    async fn run_script(
        &self,
        shell: &str,
        timeout: Duration,
        content: &str,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let path = write_script(&self.config.script_dir, content).await?;

        let mut command = Command::new(shell);
        command.arg(&path);
        let result = run_with_deadline(command, timeout).await;

        // Scratch cleanup is best effort.
        let _ = tokio::fs::remove_file(&path).await;

        classify(result?)
    }
}

fn classify(output: std::process::Output) -> Result<ExecutionOutput, ExecutionError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(ExecutionOutput { stdout, stderr })
    } else {
        Err(ExecutionError::CommandFailed {
            code: output.status.code(),
            stdout,
            stderr,
        })
    }
}

#[async_trait]
impl ShellExecutor for ProcessShellExecutor {
    async fn run(&self, job: &ShellJob) -> Result<ExecutionOutput, ExecutionError> {
        let shell = self.effective_shell(job);
        let timeout = self.effective_timeout(job);

        match &job.input {
            ShellInput::Command(cmd) => self.run_command(shell, timeout, cmd).await,
            ShellInput::Script(content) => self.run_script(shell, timeout, content).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::script_file_name;

    fn sh_executor(script_dir: PathBuf) -> ProcessShellExecutor {
        ProcessShellExecutor::new(ShellConfig {
            shell: "sh".to_string(),
            timeout: Duration::from_secs(10),
            script_dir,
        })
    }

    fn command_job(cmd: &str) -> ShellJob {
        ShellJob::new(ShellInput::Command(cmd.to_string()), None, None).unwrap()
    }

    #[tokio::test]
    async fn should_capture_stdout_when_command_succeeds() {
        let executor = sh_executor(std::env::temp_dir());

        let output = executor.run(&command_job("printf hello")).await.unwrap();

        assert_eq!(output.stdout, "hello");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn should_report_exit_code_and_stderr_when_command_fails() {
        let executor = sh_executor(std::env::temp_dir());

        let result = executor
            .run(&command_job("printf oops >&2; exit 3"))
            .await;

        match result.unwrap_err() {
            ExecutionError::CommandFailed {
                code,
                stdout,
                stderr,
            } => {
                assert_eq!(code, Some(3));
                assert!(stdout.is_empty());
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_time_out_when_command_exceeds_deadline() {
        let executor = sh_executor(std::env::temp_dir());
        let job = ShellJob::new(
            ShellInput::Command("sleep 5".to_string()),
            None,
            Some(Duration::from_millis(100)),
        )
        .unwrap();

        let result = executor.run(&job).await;

        assert!(matches!(
            result.unwrap_err(),
            ExecutionError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn should_run_script_and_remove_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let executor = sh_executor(dir.path().to_path_buf());
        let content = "#!/bin/sh\nprintf from-script\n";
        let job = ShellJob::new(ShellInput::Script(content.to_string()), None, None).unwrap();

        let output = executor.run(&job).await.unwrap();

        assert_eq!(output.stdout, "from-script");
        let leftover = dir.path().join(script_file_name(content));
        assert!(!leftover.exists());
    }

    #[tokio::test]
    async fn should_prefer_job_shell_override() {
        let executor = ProcessShellExecutor::new(ShellConfig {
            shell: "/nonexistent/never-a-shell".to_string(),
            timeout: Duration::from_secs(10),
            script_dir: std::env::temp_dir(),
        });
        let job = ShellJob::new(
            ShellInput::Command("printf ok".to_string()),
            Some("sh".to_string()),
            None,
        )
        .unwrap();

        let output = executor.run(&job).await.unwrap();

        assert_eq!(output.stdout, "ok");
    }

    #[tokio::test]
    async fn should_report_launch_failure_when_shell_missing() {
        let executor = ProcessShellExecutor::new(ShellConfig {
            shell: "/nonexistent/never-a-shell".to_string(),
            timeout: Duration::from_secs(10),
            script_dir: std::env::temp_dir(),
        });

        let result = executor.run(&command_job("printf hi")).await;

        assert!(matches!(result.unwrap_err(), ExecutionError::Launch { .. }));
    }

    #[tokio::test]
    async fn should_treat_zero_timeout_as_no_deadline() {
        let executor = sh_executor(std::env::temp_dir());
        let job = ShellJob::new(
            ShellInput::Command("printf unbounded".to_string()),
            None,
            Some(Duration::ZERO),
        )
        .unwrap();

        let output = executor.run(&job).await.unwrap();

        assert_eq!(output.stdout, "unbounded");
    }
}
