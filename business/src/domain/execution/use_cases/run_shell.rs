use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::model::{ExecutionOutput, ShellJob};

pub struct RunShellParams {
    /// Audit routing key; for API calls this is the authenticated key name.
    pub routing_key: String,
    pub job: ShellJob,
}

#[async_trait]
pub trait RunShellUseCase: Send + Sync {
    async fn execute(&self, params: RunShellParams) -> Result<ExecutionOutput, ExecutionError>;
}
