use async_trait::async_trait;

use super::errors::ExecutionError;
use super::model::{ExecutionOutput, ShellJob};

/// Port for running a shell job on the local host.
///
/// A non-zero exit is reported as `ExecutionError::CommandFailed` carrying
/// the captured output, so callers can still relay stdout/stderr.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    async fn run(&self, job: &ShellJob) -> Result<ExecutionOutput, ExecutionError>;
}

/// Port for running a shell job on a remote host, whatever the transport.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run_on(&self, host: &str, job: &ShellJob) -> Result<ExecutionOutput, ExecutionError>;
}
