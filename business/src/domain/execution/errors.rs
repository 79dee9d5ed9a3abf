use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("execution.empty_input")]
    EmptyInput,
    #[error("execution.invalid_timeout: {value}")]
    InvalidTimeout { value: String },
    #[error("execution.launch_failed: {reason}")]
    Launch { reason: String },
    #[error("execution.timeout: {limit:?}")]
    Timeout { limit: Duration },
    #[error("execution.command_failed")]
    CommandFailed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("execution.remote_failed: {detail}")]
    RemoteFailed {
        detail: String,
        stdout: String,
        stderr: String,
    },
    #[error("execution.transport_failed: {reason}")]
    Transport { reason: String },
    #[error("repository.persistence")]
    Repository(#[from] crate::domain::errors::RepositoryError),
}

impl ExecutionError {
    /// Failure description stored in the audit trail and returned on the wire.
    pub fn detail(&self) -> String {
        match self {
            ExecutionError::CommandFailed {
                code: Some(code), ..
            } => format!("exit status {code}"),
            ExecutionError::CommandFailed { code: None, .. } => "killed by signal".to_string(),
            // A remote agent already reduced its failure to a detail string;
            // relay it verbatim.
            ExecutionError::RemoteFailed { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}
