//! OpenSSL backend, drives the stateful EVP cipher API.
//!
//! A [`CipherCtx`] bound to a cipher and a direction is costly to set up, so contexts are kept in
//! [`HandlePool`]s and only re-keyed per operation. The pools are shared process wide per
//! (algorithm, direction) unless a backend is built with private pools.

mod aead;
mod registry;

use std::{marker::PhantomData, sync::Arc};

use openssl::{cipher::CipherRef, cipher_ctx::CipherCtx};

use crate::{
    aead::DEFAULT_POOL_CAPACITY,
    crypto::algorithm::{AeadAlgorithm, Algorithm},
    error::{AeadError, Result},
    pool::HandlePool,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

/// AEAD implementation using the OpenSSL library.
///
/// Clones share their pools.
#[derive(Debug, Clone)]
pub struct OpensslAead<A: AeadAlgorithm> {
    encrypt_pool: Arc<HandlePool<CipherCtx>>,
    decrypt_pool: Arc<HandlePool<CipherCtx>>,
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> OpensslAead<A> {
    /// Uses the process wide pools with [`DEFAULT_POOL_CAPACITY`]
    pub fn new() -> Self {
        Self::with_pool_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Uses the process wide pools, creating them with `capacity` if this is their first use
    pub fn with_pool_capacity(capacity: usize) -> Self {
        Self {
            encrypt_pool: registry::shared_pool(A::ALGORITHM, Direction::Encrypt, capacity),
            decrypt_pool: registry::shared_pool(A::ALGORITHM, Direction::Decrypt, capacity),
            _algorithm: PhantomData,
        }
    }

    /// Uses pools owned by this backend instance only
    pub fn with_private_pools(capacity: usize) -> Self {
        Self {
            encrypt_pool: Arc::new(new_pool(A::ALGORITHM, Direction::Encrypt, capacity)),
            decrypt_pool: Arc::new(new_pool(A::ALGORITHM, Direction::Decrypt, capacity)),
            _algorithm: PhantomData,
        }
    }

    pub fn encrypt_pool(&self) -> &HandlePool<CipherCtx> {
        &self.encrypt_pool
    }

    pub fn decrypt_pool(&self) -> &HandlePool<CipherCtx> {
        &self.decrypt_pool
    }
}

impl<A: AeadAlgorithm> Default for OpensslAead<A> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn new_pool(
    algorithm: Algorithm,
    direction: Direction,
    capacity: usize,
) -> HandlePool<CipherCtx> {
    HandlePool::new(capacity, move || new_handle(algorithm, direction))
}

fn new_handle(algorithm: Algorithm, direction: Direction) -> Result<CipherCtx> {
    let construction_error = |err: openssl::error::ErrorStack| {
        log::debug!("Creating {algorithm} {direction:?} context failed, OpenSSL error stack: {err}");
        AeadError::HandleConstruction(err.to_string())
    };

    let cipher: &CipherRef = algorithm.into();
    let mut ctx = CipherCtx::new().map_err(construction_error)?;
    let initialized = match direction {
        Direction::Encrypt => ctx.encrypt_init(Some(cipher), None, None),
        Direction::Decrypt => ctx.decrypt_init(Some(cipher), None, None),
    };
    initialized.map_err(construction_error)?;

    Ok(ctx)
}

impl From<Algorithm> for &'static CipherRef {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Aes128Gcm => openssl::cipher::Cipher::aes_128_gcm(),
            Algorithm::Aes256Gcm => openssl::cipher::Cipher::aes_256_gcm(),
            Algorithm::ChaCha20Poly1305 => openssl::cipher::Cipher::chacha20_poly1305(),
        }
    }
}
