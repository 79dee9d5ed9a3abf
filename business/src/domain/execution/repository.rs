use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::model::ExecutionRecord;

/// Port for the sharded execution audit trail.
///
/// Implementations route by `routing_key`: writes go to the shard writer,
/// reads to the shard reader.
#[async_trait]
pub trait ExecutionLogRepository: Send + Sync {
    async fn save(&self, record: &ExecutionRecord) -> Result<(), RepositoryError>;

    async fn recent(
        &self,
        routing_key: &str,
        limit: i64,
    ) -> Result<Vec<ExecutionRecord>, RepositoryError>;
}
