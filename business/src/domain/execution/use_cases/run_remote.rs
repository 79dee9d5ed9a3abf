use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::model::{ExecutionOutput, ShellJob};

pub struct RunRemoteShellParams {
    /// Target host; doubles as the audit routing key.
    pub host: String,
    pub job: ShellJob,
}

#[async_trait]
pub trait RunRemoteShellUseCase: Send + Sync {
    async fn execute(
        &self,
        params: RunRemoteShellParams,
    ) -> Result<ExecutionOutput, ExecutionError>;
}
