use std::sync::Arc;

use sqlx::PgPool;

use agent::client::AgentClient;
use agent::remote_shell::HttpRemoteExecutor;
use executor::shell::ProcessShellExecutor;
use executor::ssh::SshRemoteExecutor;
use logger::TracingLogger;
use persistence::execution::repository::ExecutionLogPostgres;

use business::application::execution::get_history::GetExecutionHistoryUseCaseImpl;
use business::application::execution::run_remote::RunRemoteShellUseCaseImpl;
use business::application::execution::run_shell::RunShellUseCaseImpl;
use business::domain::execution::executor::{RemoteExecutor, ShellExecutor};
use business::domain::execution::repository::ExecutionLogRepository;
use business::domain::sharding::pool::ShardPool;

use crate::api::security;
use crate::config::remote_config::{self, RemoteTransport};
use crate::config::{auth_config, exec_config};

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub shell_api: crate::api::shell::routes::ShellApi,
    pub executions_api: crate::api::history::routes::ExecutionsApi,
}

impl DependencyContainer {
    pub async fn new(pool: ShardPool<PgPool>) -> anyhow::Result<Self> {
        let logger = Arc::new(TracingLogger);
        let health_api = crate::api::health::routes::Api::new();

        // Infrastructure adapters
        let repository: Arc<dyn ExecutionLogRepository> =
            Arc::new(ExecutionLogPostgres::new(pool));

        let shell_config = exec_config::shell_config_from_env()?;
        let executor: Arc<dyn ShellExecutor> = Arc::new(ProcessShellExecutor::new(shell_config));

        let remote = remote_config::from_env()?;
        let remote_executor: Arc<dyn RemoteExecutor> = match remote.transport {
            RemoteTransport::Ssh => Arc::new(SshRemoteExecutor::new(remote.ssh)),
            RemoteTransport::Http => Arc::new(HttpRemoteExecutor::new(AgentClient::new(remote.agent))),
        };

        security::install_api_keys(&auth_config::api_keys_from_env()?);

        // Execution use cases
        let run_use_case = Arc::new(RunShellUseCaseImpl {
            executor,
            repository: repository.clone(),
            logger: logger.clone(),
        });
        let run_remote_use_case = Arc::new(RunRemoteShellUseCaseImpl {
            executor: remote_executor,
            repository: repository.clone(),
            logger: logger.clone(),
        });
        let get_history_use_case = Arc::new(GetExecutionHistoryUseCaseImpl { repository, logger });

        let shell_api =
            crate::api::shell::routes::ShellApi::new(run_use_case, run_remote_use_case);
        let executions_api = crate::api::history::routes::ExecutionsApi::new(get_history_use_case);

        Ok(Self {
            health_api,
            shell_api,
            executions_api,
        })
    }
}
