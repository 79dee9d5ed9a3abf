use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{path::Path, time::Duration};
use thiserror::Error;
use tracing::info;

use business::domain::sharding::errors::ShardingError;
use business::domain::sharding::pool::ShardPool;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.connection_error")]
    ConnectionError,
    #[error("database.migration_error")]
    MigrationError,
    #[error("database.shard_error")]
    Shard(#[from] ShardingError),
}

/// Connection settings shared by every shard.
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// One shard's connection URLs. At least one must be set; the missing side
/// shares the other's connection pool.
#[derive(Debug, Clone)]
pub struct ShardSource {
    pub index: u32,
    pub writer_url: Option<String>,
    pub reader_url: Option<String>,
}

/// Creates a PostgreSQL connection pool
pub async fn create_postgres_pool(
    url: &str,
    config: &DatabaseConfig,
) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(url)
        .await
        .map_err(|_| DatabaseError::ConnectionError)?;

    Ok(pool)
}

/// Connects every shard source and assembles the routing pool.
pub async fn connect_shard_pool(
    sources: &[ShardSource],
    config: &DatabaseConfig,
) -> Result<ShardPool<PgPool>, DatabaseError> {
    let mut pool = ShardPool::new();

    for source in sources {
        let writer = match &source.writer_url {
            Some(url) => Some(create_postgres_pool(url, config).await?),
            None => None,
        };
        let reader = match &source.reader_url {
            Some(url) => Some(create_postgres_pool(url, config).await?),
            None => None,
        };

        pool.add_shard(source.index, writer, reader)?;
        info!("Connected database shard {}", source.index);
    }

    Ok(pool)
}

/// Runs database migrations from the specified directory on every shard
/// writer. Re-running on an aliased handle is a no-op thanks to the
/// migrations table.
pub async fn run_migrations_on_writers(
    pool: &ShardPool<PgPool>,
    migrations_path: &str,
) -> Result<(), DatabaseError> {
    let path = Path::new(migrations_path);

    // Checks that the migrations directory exists
    if !path.exists() {
        return Err(DatabaseError::MigrationError);
    }

    let migrator = sqlx::migrate::Migrator::new(path)
        .await
        .map_err(|_| DatabaseError::MigrationError)?;

    for shard in pool.shards() {
        migrator
            .run(shard.writer())
            .await
            .map_err(|_| DatabaseError::MigrationError)?;
        info!("Applied migrations to shard {}", shard.index());
    }

    Ok(())
}
