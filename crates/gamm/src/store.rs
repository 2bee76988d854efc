//! Pool persistence behind the host's key-value storage.

use {
    crate::{
        error::{Error, Result},
        pool::Pool,
    },
    std::collections::BTreeMap,
};

/// Allocates pool ids and persists [`Pool`] records.
///
/// Writes must be atomic from the engine's perspective; the host transaction
/// context is expected to roll them back together with everything else when
/// an operation fails.
#[cfg_attr(test, mockall::automock)]
pub trait PoolStore {
    /// Returns the next pool number. The value is consumed: a subsequent call
    /// returns a strictly greater number.
    fn next_pool_number(&mut self) -> u64;

    fn fetch_pool(&self, pool_id: u64) -> Result<Pool>;

    fn store_pool(&mut self, pool: &Pool) -> Result<()>;
}

/// In-memory [`PoolStore`] for tests and hosts without a KV engine.
#[derive(Debug, Default)]
pub struct MemoryPoolStore {
    pools: BTreeMap<u64, Pool>,
    last_pool_number: u64,
}

impl MemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoolStore for MemoryPoolStore {
    fn next_pool_number(&mut self) -> u64 {
        self.last_pool_number += 1;
        self.last_pool_number
    }

    fn fetch_pool(&self, pool_id: u64) -> Result<Pool> {
        self.pools
            .get(&pool_id)
            .cloned()
            .ok_or(Error::PoolNotFound { pool_id })
    }

    fn store_pool(&mut self, pool: &Pool) -> Result<()> {
        self.pools.insert(pool.id, pool.clone());
        Ok(())
    }
}
