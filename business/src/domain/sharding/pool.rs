use std::sync::Arc;

use super::errors::ShardingError;
use super::routing::{IndexFn, last_byte_index};

/// One shard of the pool: a writer handle and a reader handle for the same
/// backing database.
///
/// `index` identifies the shard for upserts and fixes its place in the sort
/// order; it is never used as a direct lookup key. The handles are owned by
/// the integrator (the pool neither opens nor closes the underlying
/// connections) and both are always present: when a shard is created with
/// only one half, the other aliases it.
#[derive(Debug, Clone)]
pub struct ReadWriteShard<H> {
    index: u32,
    writer: H,
    reader: H,
}

impl<H> ReadWriteShard<H> {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn writer(&self) -> &H {
        &self.writer
    }

    pub fn reader(&self) -> &H {
        &self.reader
    }
}

/// Sharded read/write pool: routes a key to one shard out of a small, fixed
/// set and exposes that shard's writer and reader handles separately.
///
/// Routing is position-based: `position = index_fn(key) % shard_count` over
/// the list sorted by shard `index`. Changing the number of shards therefore
/// re-routes every key. This is a load-distribution scheme, not stable shard
/// ownership, and is kept as such.
///
/// The empty key is special-cased: it always resolves to the shard at sorted
/// position 0 without consulting the routing function at all. The two paths
/// are not equivalent once a custom routing function is installed, so the
/// shortcut must stay in front of the function call.
///
/// The pool is not internally synchronized. `add_shard`, `add_reader_shard`
/// and `set_index_fn` must not race `writer`/`reader`/`shards`; the expected
/// pattern is to build the pool completely before sharing it. All operations
/// are synchronous in-memory computation; the pool performs no I/O.
pub struct ShardPool<H> {
    shards: Vec<ReadWriteShard<H>>,
    index_fn: IndexFn,
}

impl<H: Clone> ShardPool<H> {
    /// Creates an empty pool with the default last-byte routing function.
    pub fn new() -> Self {
        Self {
            shards: Vec::new(),
            index_fn: Arc::new(last_byte_index),
        }
    }

    /// Replaces the routing function.
    ///
    /// The function must map a given key to the same bucket forever;
    /// otherwise reads and writes for one key stop landing on one shard.
    pub fn set_index_fn(&mut self, index_fn: IndexFn) {
        self.index_fn = index_fn;
    }

    /// Inserts or updates the shard for `index`.
    ///
    /// At least one handle must be supplied; a missing half aliases the
    /// supplied one. Upserting an existing index overwrites both halves and
    /// never duplicates the entry. The shard list stays sorted by `index`
    /// ascending.
    pub fn add_shard(
        &mut self,
        index: u32,
        writer: Option<H>,
        reader: Option<H>,
    ) -> Result<(), ShardingError> {
        let (writer, reader) = match (writer, reader) {
            (Some(writer), Some(reader)) => (writer, reader),
            (Some(writer), None) => (writer.clone(), writer),
            (None, Some(reader)) => (reader.clone(), reader),
            (None, None) => return Err(ShardingError::ShardWithoutHandles { index }),
        };

        if let Some(shard) = self.shards.iter_mut().find(|s| s.index == index) {
            shard.writer = writer;
            shard.reader = reader;
            return Ok(());
        }

        self.shards.push(ReadWriteShard {
            index,
            writer,
            reader,
        });
        self.shards.sort_by_key(|s| s.index);
        Ok(())
    }

    /// Inserts or updates only the reader half of the shard for `index`.
    ///
    /// If the shard does not exist yet it is created with the writer
    /// aliasing the reader; an existing writer is left untouched.
    pub fn add_reader_shard(&mut self, index: u32, reader: H) -> Result<(), ShardingError> {
        if let Some(shard) = self.shards.iter_mut().find(|s| s.index == index) {
            shard.reader = reader;
            return Ok(());
        }
        self.add_shard(index, None, Some(reader))
    }

    fn shard_for(&self, key: &str) -> Result<&ReadWriteShard<H>, ShardingError> {
        if self.shards.is_empty() {
            return Err(ShardingError::NoShards);
        }
        if key.is_empty() {
            return Ok(&self.shards[0]);
        }

        let position = (self.index_fn)(key)? % self.shards.len();
        Ok(&self.shards[position])
    }

    /// Returns the writer handle of the shard the key routes to.
    pub fn writer(&self, key: &str) -> Result<&H, ShardingError> {
        Ok(&self.shard_for(key)?.writer)
    }

    /// Returns the reader handle of the shard the key routes to.
    pub fn reader(&self, key: &str) -> Result<&H, ShardingError> {
        Ok(&self.shard_for(key)?.reader)
    }

    /// All shards in sorted order, as a read-only view.
    pub fn shards(&self) -> &[ReadWriteShard<H>] {
        &self.shards
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

impl<H: Clone> Default for ShardPool<H> {
    fn default() -> Self {
        Self::new()
    }
}
