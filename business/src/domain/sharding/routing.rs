use std::sync::Arc;

use super::errors::ShardingError;

/// Pluggable routing function: maps a routing key to a shard bucket.
///
/// The result is reduced modulo the shard count by the pool, so the bucket
/// range does not have to match the number of shards. The signature is
/// fallible so that custom functions can reject keys they cannot hash;
/// the pool only ever invokes it with a non-empty key.
pub type IndexFn = Arc<dyn Fn(&str) -> Result<usize, ShardingError> + Send + Sync>;

/// Default routing function: buckets a key by its last byte.
///
/// - `'0'..'9'` map to 0-9
/// - `'a'..'z'` map to 10-35
/// - `'A'..'Z'` map to 36-61
/// - any other trailing byte maps to 0
///
/// The empty key cannot be hashed and fails with `EmptyRoutingKey`.
pub fn last_byte_index(key: &str) -> Result<usize, ShardingError> {
    let byte = *key
        .as_bytes()
        .last()
        .ok_or(ShardingError::EmptyRoutingKey)?;

    Ok(match byte {
        b'0'..=b'9' => (byte - b'0') as usize,
        b'a'..=b'z' => (byte - b'a') as usize + 10,
        b'A'..=b'Z' => (byte - b'A') as usize + 36,
        _ => 0,
    })
}

/// The closed set of routing functions resolvable from configuration.
///
/// A routing function is mandatory for the pool to be usable, so resolution
/// fails fast on a blank or unknown name instead of leaving the pool without
/// one.
pub enum KeyIndexer {
    /// The default `last_byte_index` function.
    LastByte,
    /// A caller-supplied routing function.
    Custom(IndexFn),
}

impl KeyIndexer {
    /// Resolves an indexer from its configured name.
    pub fn from_name(name: &str) -> Result<Self, ShardingError> {
        match name.trim() {
            "last-byte" => Ok(KeyIndexer::LastByte),
            _ => Err(ShardingError::MissingIndexFn),
        }
    }

    /// Wraps an arbitrary routing function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<usize, ShardingError> + Send + Sync + 'static,
    {
        KeyIndexer::Custom(Arc::new(f))
    }

    /// Converts the indexer into the function the pool stores.
    pub fn into_fn(self) -> IndexFn {
        match self {
            KeyIndexer::LastByte => Arc::new(last_byte_index),
            KeyIndexer::Custom(f) => f,
        }
    }
}
