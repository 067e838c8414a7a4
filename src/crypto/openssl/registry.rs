use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use openssl::cipher_ctx::CipherCtx;

use super::{new_pool, Direction};
use crate::{crypto::algorithm::Algorithm, pool::HandlePool};

type PoolKey = (Algorithm, Direction);

static POOLS: OnceLock<Mutex<HashMap<PoolKey, Arc<HandlePool<CipherCtx>>>>> = OnceLock::new();

/// Returns the pool shared by every backend of this `algorithm` and `direction`.
///
/// The first lookup creates the pool with `capacity`, later lookups keep the existing pool.
pub(super) fn shared_pool(
    algorithm: Algorithm,
    direction: Direction,
    capacity: usize,
) -> Arc<HandlePool<CipherCtx>> {
    let mut pools = POOLS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let pool = pools.entry((algorithm, direction)).or_insert_with(|| {
        log::debug!("Creating shared {algorithm} {direction:?} pool with capacity {capacity}");
        Arc::new(new_pool(algorithm, direction, capacity))
    });

    if pool.capacity() != capacity.max(1) {
        log::warn!(
            "Shared {algorithm} {direction:?} pool already exists with capacity {}, ignoring requested capacity {capacity}",
            pool.capacity()
        );
    }

    pool.clone()
}
