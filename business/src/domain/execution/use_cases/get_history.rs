use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::model::ExecutionRecord;

pub struct GetExecutionHistoryParams {
    /// Empty is allowed: the sharded store then reads the first shard.
    pub routing_key: String,
    pub limit: Option<u32>,
}

#[async_trait]
pub trait GetExecutionHistoryUseCase: Send + Sync {
    async fn execute(
        &self,
        params: GetExecutionHistoryParams,
    ) -> Result<Vec<ExecutionRecord>, ExecutionError>;
}
