//! RustCrypto backend.
//!
//! This module uses pure Rust implementations from the RustCrypto project.

mod aead;

use std::marker::PhantomData;

use crate::crypto::algorithm::AeadAlgorithm;

/// AEAD implementation using RustCrypto libraries.
#[derive(Clone, Copy, Debug, Default)]
pub struct RustCryptoAead<A: AeadAlgorithm> {
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> RustCryptoAead<A> {
    pub fn new() -> Self {
        Self {
            _algorithm: PhantomData,
        }
    }
}
