use std::{collections::BTreeMap, env, time::Duration};

use anyhow::{Context, bail};
use business::domain::sharding::pool::ShardPool;
use business::domain::sharding::routing::KeyIndexer;
use persistence::db::{self, DatabaseConfig, ShardSource};
use sqlx::PgPool;

/// Initialize the sharded database pool from environment variables
///
/// Environment variables:
/// - DATABASE_WRITER_URLS / DATABASE_READER_URLS: comma-separated `index=url`
///   pairs, e.g. "0=postgres://db-a/ops,1=postgres://db-b/ops"
/// - DATABASE_URL: single-shard fallback when neither list is set
/// - DATABASE_MAX_CONNECTIONS: per-shard pool size (default: 5)
/// - DATABASE_ACQUIRE_TIMEOUT_SECS: connection acquire timeout (default: 30)
/// - DATABASE_SHARD_INDEXER: routing function name (default: "last-byte")
/// - DATABASE_RUN_MIGRATIONS: "true" to apply migrations to every shard
///   writer on startup
/// - DATABASE_MIGRATIONS_PATH: migrations directory
///   (default: "infrastructure/persistence/migrations")
///
/// # Errors
/// Returns error if no database URL is configured, a shard entry is
/// malformed, or a connection fails
pub async fn init_database() -> anyhow::Result<ShardPool<PgPool>> {
    let sources = shard_sources_from_env()?;
    let config = connection_config_from_env()?;

    let mut pool = db::connect_shard_pool(&sources, &config).await?;

    if let Ok(name) = env::var("DATABASE_SHARD_INDEXER") {
        let indexer = KeyIndexer::from_name(&name)
            .with_context(|| format!("unknown shard indexer {name:?}"))?;
        pool.set_index_fn(indexer.into_fn());
    }

    if env::var("DATABASE_RUN_MIGRATIONS").is_ok_and(|value| value == "true") {
        let path = env::var("DATABASE_MIGRATIONS_PATH")
            .unwrap_or_else(|_| "infrastructure/persistence/migrations".to_string());
        db::run_migrations_on_writers(&pool, &path).await?;
    }

    Ok(pool)
}

fn connection_config_from_env() -> anyhow::Result<DatabaseConfig> {
    let mut config = DatabaseConfig::default();

    if let Ok(raw) = env::var("DATABASE_MAX_CONNECTIONS") {
        config.max_connections = raw
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be an integer")?;
    }
    if let Ok(raw) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
        let seconds = raw
            .parse()
            .context("DATABASE_ACQUIRE_TIMEOUT_SECS must be a whole number of seconds")?;
        config.acquire_timeout = Duration::from_secs(seconds);
    }

    Ok(config)
}

fn shard_sources_from_env() -> anyhow::Result<Vec<ShardSource>> {
    let writers = env::var("DATABASE_WRITER_URLS").unwrap_or_default();
    let readers = env::var("DATABASE_READER_URLS").unwrap_or_default();

    if writers.trim().is_empty() && readers.trim().is_empty() {
        let url = env::var("DATABASE_URL").context(
            "set DATABASE_URL, or DATABASE_WRITER_URLS/DATABASE_READER_URLS for a sharded setup",
        )?;
        return Ok(vec![ShardSource {
            index: 0,
            writer_url: Some(url),
            reader_url: None,
        }]);
    }

    merge_shard_sources(&writers, &readers)
}

/// Merges the writer and reader URL lists by shard index. An index present in
/// only one list leaves the other half `None`; the pool aliases the missing
/// half at insert time.
fn merge_shard_sources(writers: &str, readers: &str) -> anyhow::Result<Vec<ShardSource>> {
    let mut merged: BTreeMap<u32, ShardSource> = BTreeMap::new();

    for (index, url) in parse_indexed_urls(writers)? {
        merged
            .entry(index)
            .or_insert_with(|| ShardSource {
                index,
                writer_url: None,
                reader_url: None,
            })
            .writer_url = Some(url);
    }
    for (index, url) in parse_indexed_urls(readers)? {
        merged
            .entry(index)
            .or_insert_with(|| ShardSource {
                index,
                writer_url: None,
                reader_url: None,
            })
            .reader_url = Some(url);
    }

    Ok(merged.into_values().collect())
}

/// Parses a comma-separated list of `index=url` pairs.
fn parse_indexed_urls(list: &str) -> anyhow::Result<Vec<(u32, String)>> {
    let mut entries = Vec::new();

    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((index, url)) = part.split_once('=') else {
            bail!("malformed shard entry {part:?}, expected index=url");
        };
        let index: u32 = index
            .trim()
            .parse()
            .with_context(|| format!("shard index {index:?} is not a number"))?;
        let url = url.trim();
        if url.is_empty() {
            bail!("shard {index} has an empty url");
        }
        entries.push((index, url.to_string()));
    }

    Ok(entries)
}
