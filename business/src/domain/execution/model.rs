use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ExecutionError;

/// What to execute: a single shell command line, or the content of a script
/// file to be materialized and run.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    Command(String),
    Script(String),
}

impl ShellInput {
    pub fn kind(&self) -> ExecutionKind {
        match self {
            ShellInput::Command(_) => ExecutionKind::Command,
            ShellInput::Script(_) => ExecutionKind::Script,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ShellInput::Command(text) => text,
            ShellInput::Script(text) => text,
        }
    }
}

/// A validated request to run something in a shell.
///
/// `shell` and `timeout` are per-job overrides; when unset the executor
/// applies its configured defaults. A zero timeout disables the deadline.
#[derive(Debug, Clone)]
pub struct ShellJob {
    pub input: ShellInput,
    pub shell: Option<String>,
    pub timeout: Option<Duration>,
}

impl ShellJob {
    pub fn new(
        input: ShellInput,
        shell: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ExecutionError> {
        if input.text().trim().is_empty() {
            return Err(ExecutionError::EmptyInput);
        }

        Ok(Self {
            input,
            shell,
            timeout,
        })
    }
}

/// Captured output of a successfully launched, zero-exit execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionKind {
    Command,
    Script,
}

impl std::fmt::Display for ExecutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionKind::Command => write!(f, "command"),
            ExecutionKind::Script => write!(f, "script"),
        }
    }
}

impl std::str::FromStr for ExecutionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" => Ok(ExecutionKind::Command),
            "script" => Ok(ExecutionKind::Script),
            _ => Err(format!("Invalid execution kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Succeeded,
    Failed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Succeeded => write!(f, "succeeded"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(ExecutionStatus::Succeeded),
            "failed" => Ok(ExecutionStatus::Failed),
            _ => Err(format!("Invalid execution status: {}", s)),
        }
    }
}

/// One row of the execution audit trail.
///
/// `routing_key` is what the sharded store routes on: the caller principal
/// for local runs, the target host for remote runs.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub routing_key: String,
    pub kind: ExecutionKind,
    pub command: String,
    pub status: ExecutionStatus,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl ExecutionRecord {
    /// Builds the audit row for a finished execution, successful or not.
    pub fn capture(
        routing_key: String,
        job: &ShellJob,
        outcome: &Result<ExecutionOutput, ExecutionError>,
        duration_ms: i64,
    ) -> Self {
        let (status, error) = match outcome {
            Ok(_) => (ExecutionStatus::Succeeded, None),
            Err(err) => (ExecutionStatus::Failed, Some(err.detail())),
        };

        Self {
            id: Uuid::new_v4(),
            routing_key,
            kind: job.input.kind(),
            command: job.input.text().to_string(),
            status,
            error,
            duration_ms,
            created_at: Utc::now(),
        }
    }

    /// Constructor for data already persisted in the repository (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn from_repository(
        id: Uuid,
        routing_key: String,
        kind: ExecutionKind,
        command: String,
        status: ExecutionStatus,
        error: Option<String>,
        duration_ms: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            routing_key,
            kind,
            command,
            status,
            error,
            duration_ms,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn should_create_job_when_command_not_empty() {
        let result = ShellJob::new(ShellInput::Command("uptime".to_string()), None, None);

        assert!(result.is_ok());
        let job = result.unwrap();
        assert_eq!(job.input.kind(), ExecutionKind::Command);
        assert_eq!(job.input.text(), "uptime");
    }

    #[test]
    fn should_reject_when_command_empty() {
        let result = ShellJob::new(ShellInput::Command("".to_string()), None, None);

        assert!(matches!(result.unwrap_err(), ExecutionError::EmptyInput));
    }

    #[test]
    fn should_reject_when_script_only_whitespace() {
        let result = ShellJob::new(ShellInput::Script("  \n\t ".to_string()), None, None);

        assert!(matches!(result.unwrap_err(), ExecutionError::EmptyInput));
    }

    #[test]
    fn should_keep_overrides_when_provided() {
        let job = ShellJob::new(
            ShellInput::Script("#!/bin/sh\nuptime\n".to_string()),
            Some("sh".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        assert_eq!(job.shell.as_deref(), Some("sh"));
        assert_eq!(job.timeout, Some(Duration::from_secs(5)));
        assert_eq!(job.input.kind(), ExecutionKind::Script);
    }

    #[test]
    fn should_capture_successful_outcome() {
        let job = ShellJob::new(ShellInput::Command("uptime".to_string()), None, None).unwrap();
        let outcome = Ok(ExecutionOutput {
            stdout: "up 3 days".to_string(),
            stderr: String::new(),
        });

        let record = ExecutionRecord::capture("ops".to_string(), &job, &outcome, 12);

        assert_eq!(record.routing_key, "ops");
        assert_eq!(record.kind, ExecutionKind::Command);
        assert_eq!(record.command, "uptime");
        assert_eq!(record.status, ExecutionStatus::Succeeded);
        assert!(record.error.is_none());
        assert_eq!(record.duration_ms, 12);
    }

    #[test]
    fn should_capture_exit_code_when_command_fails() {
        let job = ShellJob::new(ShellInput::Command("false".to_string()), None, None).unwrap();
        let outcome = Err(ExecutionError::CommandFailed {
            code: Some(1),
            stdout: String::new(),
            stderr: String::new(),
        });

        let record = ExecutionRecord::capture("ops".to_string(), &job, &outcome, 3);

        assert_eq!(record.status, ExecutionStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("exit status 1"));
    }

    #[test]
    fn should_capture_timeout_detail_when_execution_times_out() {
        let job = ShellJob::new(ShellInput::Command("sleep 90".to_string()), None, None).unwrap();
        let outcome = Err(ExecutionError::Timeout {
            limit: Duration::from_secs(60),
        });

        let record = ExecutionRecord::capture("ops".to_string(), &job, &outcome, 60_000);

        assert_eq!(record.status, ExecutionStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("execution.timeout: 60s"));
    }

    #[test]
    fn should_round_trip_kind_and_status_labels() {
        assert_eq!(ExecutionKind::Command.to_string(), "command");
        assert_eq!(ExecutionKind::from_str("script").unwrap(), ExecutionKind::Script);
        assert!(ExecutionKind::from_str("job").is_err());

        assert_eq!(ExecutionStatus::Failed.to_string(), "failed");
        assert_eq!(
            ExecutionStatus::from_str("succeeded").unwrap(),
            ExecutionStatus::Succeeded
        );
        assert!(ExecutionStatus::from_str("ok").is_err());
    }
}
