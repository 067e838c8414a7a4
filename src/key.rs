use std::{fmt, marker::PhantomData};

use zeroize::Zeroize;

use crate::{
    crypto::algorithm::AeadAlgorithm,
    error::{AeadError, Result},
};

/// Symmetric key of algorithm `A`.
///
/// The length always equals the key length of `A`. The bytes are wiped when the key is dropped.
pub struct Key<A: AeadAlgorithm> {
    bytes: Vec<u8>,
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> Key<A> {
    pub(crate) fn random_with<F>(fill_random: F) -> Result<Self>
    where
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        let mut bytes = vec![0u8; A::params().key_len];
        fill_random(&mut bytes)?;
        Ok(Self {
            bytes,
            _algorithm: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<A: AeadAlgorithm> TryFrom<Vec<u8>> for Key<A> {
    type Error = AeadError;

    fn try_from(mut bytes: Vec<u8>) -> Result<Self> {
        let expected = A::params().key_len;
        if bytes.len() != expected {
            let actual = bytes.len();
            bytes.zeroize();
            return Err(AeadError::InvalidKeyLength { expected, actual });
        }

        Ok(Self {
            bytes,
            _algorithm: PhantomData,
        })
    }
}

impl<A: AeadAlgorithm> TryFrom<&[u8]> for Key<A> {
    type Error = AeadError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::try_from(bytes.to_vec())
    }
}

impl<A: AeadAlgorithm> Clone for Key<A> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            _algorithm: PhantomData,
        }
    }
}

impl<A: AeadAlgorithm> Drop for Key<A> {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl<A: AeadAlgorithm> fmt::Debug for Key<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &A::ALGORITHM)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// Nonce (IV) of algorithm `A`.
///
/// A nonce must never be used twice with the same key. Freshly generated nonces are
/// random, uniqueness across calls is not tracked and remains the obligation of the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce<A: AeadAlgorithm> {
    bytes: Vec<u8>,
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> Nonce<A> {
    pub(crate) fn random_with<F>(fill_random: F) -> Result<Self>
    where
        F: FnOnce(&mut [u8]) -> Result<()>,
    {
        let mut bytes = vec![0u8; A::params().nonce_len];
        fill_random(&mut bytes)?;
        Ok(Self {
            bytes,
            _algorithm: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<A: AeadAlgorithm> TryFrom<&[u8]> for Nonce<A> {
    type Error = AeadError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let expected = A::params().nonce_len;
        if bytes.len() != expected {
            return Err(AeadError::InvalidNonceLength {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            bytes: bytes.to_vec(),
            _algorithm: PhantomData,
        })
    }
}

impl<A: AeadAlgorithm> AsRef<[u8]> for Nonce<A> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<A: AeadAlgorithm> fmt::Debug for Nonce<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nonce")
            .field("algorithm", &A::ALGORITHM)
            .field("bytes", &self.bytes)
            .finish()
    }
}
