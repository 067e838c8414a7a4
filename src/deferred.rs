//! Deferred execution of cipher operations.
//!
//! A [`Deferred`] captures an operation together with owned copies of its inputs without running
//! it. The caller decides where it runs: inline with [`Deferred::run`], on a thread or worker pool
//! of its choosing (it is `Send + 'static`), or by awaiting it, which runs it on the polling task.

use std::{
    fmt,
    future::{ready, IntoFuture, Ready},
};

use crate::error::Result;

type Operation<T> = Box<dyn FnOnce() -> Result<T> + Send + 'static>;

#[must_use = "a deferred operation does nothing until it is run or awaited"]
pub struct Deferred<T> {
    operation: Operation<T>,
}

impl<T> Deferred<T> {
    pub fn new<F>(operation: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Self {
            operation: Box::new(operation),
        }
    }

    /// Runs the operation on the calling thread
    pub fn run(self) -> Result<T> {
        (self.operation)()
    }

    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        T: 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Deferred::new(move || self.run().map(f))
    }
}

impl<T> IntoFuture for Deferred<T> {
    type Output = Result<T>;
    type IntoFuture = Ready<Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.run())
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}
