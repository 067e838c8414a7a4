//! Ring backend, binds every AEAD operation to a single ring call.

mod aead;

use std::marker::PhantomData;

use ring::rand::SystemRandom;

use crate::crypto::algorithm::{AeadAlgorithm, Algorithm};

/// AEAD implementation using the ring library.
///
/// The ring algorithm descriptor is resolved once on construction and reused for every call.
#[derive(Debug)]
pub struct RingAead<A: AeadAlgorithm> {
    algorithm: &'static ring::aead::Algorithm,
    rng: SystemRandom,
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> RingAead<A> {
    pub fn new() -> Self {
        let algorithm: &'static ring::aead::Algorithm = A::ALGORITHM.into();
        let params = A::params();
        debug_assert_eq!(algorithm.key_len(), params.key_len);
        debug_assert_eq!(algorithm.nonce_len(), params.nonce_len);
        debug_assert_eq!(algorithm.tag_len(), params.tag_len);

        Self {
            algorithm,
            rng: SystemRandom::new(),
            _algorithm: PhantomData,
        }
    }
}

impl<A: AeadAlgorithm> Default for RingAead<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Algorithm> for &'static ring::aead::Algorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Aes128Gcm => &ring::aead::AES_128_GCM,
            Algorithm::Aes256Gcm => &ring::aead::AES_256_GCM,
            Algorithm::ChaCha20Poly1305 => &ring::aead::CHACHA20_POLY1305,
        }
    }
}
