//! Bounded pool of reusable cipher handles.
//!
//! Handles are expensive to construct and must not be used by two operations at the same time.
//! [`HandlePool::acquire`] hands out an idle handle, or builds a fresh one when none is idle, wrapped
//! in a [`PooledHandle`] guard. Dropping the guard returns the handle, on every exit path of the
//! operation. Handles returned while the pool is full are dropped.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};

use crossbeam_queue::ArrayQueue;

use crate::error::Result;

type Factory<H> = Box<dyn Fn() -> Result<H> + Send + Sync>;

pub struct HandlePool<H> {
    idle: ArrayQueue<H>,
    factory: Factory<H>,
    created: AtomicUsize,
}

impl<H> HandlePool<H> {
    /// A `capacity` of zero is raised to one.
    pub fn new<F>(capacity: usize, factory: F) -> Self
    where
        F: Fn() -> Result<H> + Send + Sync + 'static,
    {
        Self {
            idle: ArrayQueue::new(capacity.max(1)),
            factory: Box::new(factory),
            created: AtomicUsize::new(0),
        }
    }

    /// Checks out an idle handle or constructs a new one. Never blocks.
    pub fn acquire(&self) -> Result<PooledHandle<'_, H>> {
        let handle = match self.idle.pop() {
            Some(handle) => handle,
            None => {
                let handle = (self.factory)()?;
                let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                log::trace!("Pool exhausted, constructed handle #{created}");
                handle
            }
        };

        Ok(PooledHandle {
            pool: self,
            handle: Some(handle),
        })
    }

    fn release(&self, handle: H) {
        if self.idle.push(handle).is_err() {
            log::trace!(
                "Pool at capacity {}, discarding handle",
                self.idle.capacity()
            );
        }
    }

    pub fn capacity(&self) -> usize {
        self.idle.capacity()
    }

    /// Number of handles currently waiting in the pool
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Number of handles constructed over the lifetime of the pool
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

impl<H> fmt::Debug for HandlePool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlePool")
            .field("capacity", &self.capacity())
            .field("idle", &self.idle())
            .field("created", &self.created())
            .finish()
    }
}

/// Exclusive access to a handle checked out of a [`HandlePool`]
pub struct PooledHandle<'p, H> {
    pool: &'p HandlePool<H>,
    handle: Option<H>,
}

impl<H> Deref for PooledHandle<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        // only taken in drop
        self.handle.as_ref().unwrap()
    }
}

impl<H> DerefMut for PooledHandle<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.handle.as_mut().unwrap()
    }
}

impl<H> Drop for PooledHandle<'_, H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}
