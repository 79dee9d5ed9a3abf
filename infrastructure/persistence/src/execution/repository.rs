use async_trait::async_trait;
use sqlx::PgPool;

use business::domain::errors::RepositoryError;
use business::domain::execution::model::ExecutionRecord;
use business::domain::execution::repository::ExecutionLogRepository;
use business::domain::sharding::pool::ShardPool;

use crate::execution::entity::ExecutionRecordEntity;

/// Execution log backed by sharded PostgreSQL. Writes route through the
/// shard's writer handle, reads through its reader handle, both picked by
/// the record's routing key.
pub struct ExecutionLogPostgres {
    pool: ShardPool<PgPool>,
}

impl ExecutionLogPostgres {
    pub fn new(pool: ShardPool<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExecutionLogRepository for ExecutionLogPostgres {
    async fn save(&self, record: &ExecutionRecord) -> Result<(), RepositoryError> {
        let writer = self
            .pool
            .writer(&record.routing_key)
            .map_err(|_| RepositoryError::Unroutable)?;

        sqlx::query(
            "INSERT INTO executions (id, routing_key, kind, command, status, error, duration_ms, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.id)
        .bind(&record.routing_key)
        .bind(record.kind.to_string())
        .bind(&record.command)
        .bind(record.status.to_string())
        .bind(&record.error)
        .bind(record.duration_ms)
        .bind(record.created_at)
        .execute(writer)
        .await
        .map_err(|_| RepositoryError::DatabaseError)?;

        Ok(())
    }

    /// An empty routing key lands on the first shard and returns its history
    /// across all keys, newest first.
    async fn recent(
        &self,
        routing_key: &str,
        limit: i64,
    ) -> Result<Vec<ExecutionRecord>, RepositoryError> {
        let reader = self
            .pool
            .reader(routing_key)
            .map_err(|_| RepositoryError::Unroutable)?;

        let entities = if routing_key.is_empty() {
            sqlx::query_as::<_, ExecutionRecordEntity>(
                "SELECT id, routing_key, kind, command, status, error, duration_ms, created_at
                 FROM executions ORDER BY created_at DESC LIMIT $1",
            )
            .bind(limit)
            .fetch_all(reader)
            .await
            .map_err(|_| RepositoryError::DatabaseError)?
        } else {
            sqlx::query_as::<_, ExecutionRecordEntity>(
                "SELECT id, routing_key, kind, command, status, error, duration_ms, created_at
                 FROM executions WHERE routing_key = $1 ORDER BY created_at DESC LIMIT $2",
            )
            .bind(routing_key)
            .bind(limit)
            .fetch_all(reader)
            .await
            .map_err(|_| RepositoryError::DatabaseError)?
        };

        Ok(entities.into_iter().map(|entity| entity.into_domain()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::execution::model::{ExecutionOutput, ShellInput, ShellJob};

    #[tokio::test]
    async fn should_fail_with_unroutable_when_pool_has_no_shards() {
        let repository = ExecutionLogPostgres::new(ShardPool::new());
        let job = ShellJob::new(ShellInput::Command("uptime".to_string()), None, None)
            .expect("valid job");
        let record = ExecutionRecord::capture(
            "tenant7".to_string(),
            &job,
            &Ok(ExecutionOutput::default()),
            5,
        );

        let saved = repository.save(&record).await;
        assert!(matches!(saved, Err(RepositoryError::Unroutable)));

        let fetched = repository.recent("tenant7", 10).await;
        assert!(matches!(fetched, Err(RepositoryError::Unroutable)));
    }
}
