use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::model::ExecutionRecord;
use crate::domain::execution::repository::ExecutionLogRepository;
use crate::domain::execution::use_cases::get_history::{
    GetExecutionHistoryParams, GetExecutionHistoryUseCase,
};
use crate::domain::logger::Logger;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

pub struct GetExecutionHistoryUseCaseImpl {
    pub repository: Arc<dyn ExecutionLogRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetExecutionHistoryUseCase for GetExecutionHistoryUseCaseImpl {
    async fn execute(
        &self,
        params: GetExecutionHistoryParams,
    ) -> Result<Vec<ExecutionRecord>, ExecutionError> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

        self.logger.debug(&format!(
            "Fetching {} executions for '{}'",
            limit, params.routing_key
        ));

        let records = self
            .repository
            .recent(&params.routing_key, i64::from(limit))
            .await?;
        Ok(records)
    }
}
