use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::executor::RemoteExecutor;
use crate::domain::execution::model::{ExecutionOutput, ExecutionRecord};
use crate::domain::execution::repository::ExecutionLogRepository;
use crate::domain::execution::use_cases::run_remote::{
    RunRemoteShellParams, RunRemoteShellUseCase,
};
use crate::domain::logger::Logger;

pub struct RunRemoteShellUseCaseImpl {
    pub executor: Arc<dyn RemoteExecutor>,
    pub repository: Arc<dyn ExecutionLogRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl RunRemoteShellUseCase for RunRemoteShellUseCaseImpl {
    async fn execute(
        &self,
        params: RunRemoteShellParams,
    ) -> Result<ExecutionOutput, ExecutionError> {
        self.logger.info(&format!(
            "Running remote {} on '{}'",
            params.job.input.kind(),
            params.host
        ));

        let started = Instant::now();
        let outcome = self.executor.run_on(&params.host, &params.job).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        // Audited under the target host, so per-host history shards together.
        let record = ExecutionRecord::capture(params.host, &params.job, &outcome, duration_ms);
        if let Err(err) = self.repository.save(&record).await {
            self.logger
                .warn(&format!("Execution {} not recorded: {}", record.id, err));
        }

        match &outcome {
            Ok(_) => self.logger.info(&format!(
                "Execution {} succeeded in {}ms",
                record.id, duration_ms
            )),
            Err(err) => self
                .logger
                .warn(&format!("Execution {} failed: {}", record.id, err)),
        }

        outcome
    }
}
