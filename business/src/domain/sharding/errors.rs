/// Sharding errors for the read/write pool.
/// Use code-style identifiers for all error variants for i18n compatibility.
///
/// These are all caller-configuration errors: they are detected synchronously
/// and returned at the call that triggers them. The pool never retries or
/// recovers on its own.
#[derive(Debug, thiserror::Error)]
pub enum ShardingError {
    /// Neither a writer nor a reader handle was supplied for a shard.
    #[error("sharding.shard_without_handles")]
    ShardWithoutHandles { index: u32 },
    /// An empty key was given to a routing function that requires a
    /// non-empty key. The pool's own empty-key shortcut never raises this.
    #[error("sharding.empty_routing_key")]
    EmptyRoutingKey,
    /// A lookup was attempted on a pool with zero shards.
    #[error("sharding.no_shards")]
    NoShards,
    /// No routing function could be resolved from configuration.
    #[error("sharding.missing_index_fn")]
    MissingIndexFn,
}
