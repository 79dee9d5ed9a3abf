use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::execution::errors::ExecutionError;
use crate::domain::execution::executor::ShellExecutor;
use crate::domain::execution::model::{ExecutionOutput, ExecutionRecord};
use crate::domain::execution::repository::ExecutionLogRepository;
use crate::domain::execution::use_cases::run_shell::{RunShellParams, RunShellUseCase};
use crate::domain::logger::Logger;

pub struct RunShellUseCaseImpl {
    pub executor: Arc<dyn ShellExecutor>,
    pub repository: Arc<dyn ExecutionLogRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl RunShellUseCase for RunShellUseCaseImpl {
    async fn execute(&self, params: RunShellParams) -> Result<ExecutionOutput, ExecutionError> {
        self.logger.info(&format!(
            "Running local {} for '{}'",
            params.job.input.kind(),
            params.routing_key
        ));

        let started = Instant::now();
        let outcome = self.executor.run(&params.job).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        let record =
            ExecutionRecord::capture(params.routing_key, &params.job, &outcome, duration_ms);

        // The audit trail is best effort: a write failure must never turn a
        // finished execution into an error.
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
