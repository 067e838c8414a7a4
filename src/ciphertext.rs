//! Byte layout of encrypted messages.
//!
//! In combined form the content of a [`Ciphertext`] is `payload || tag`, the tag occupying the
//! final `tag_len` bytes. In detached form the content is the payload only and the tag travels
//! separately as [`AuthTag`].

use std::marker::PhantomData;

use crate::{
    crypto::algorithm::AeadAlgorithm,
    error::{AeadError, Result},
    key::Nonce,
};

/// Encrypted bytes together with the nonce they were produced with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext<A: AeadAlgorithm> {
    nonce: Nonce<A>,
    content: Vec<u8>,
}

impl<A: AeadAlgorithm> Ciphertext<A> {
    pub fn new(nonce: Nonce<A>, content: Vec<u8>) -> Self {
        Self { nonce, content }
    }

    pub fn nonce(&self) -> &Nonce<A> {
        &self.nonce
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut [u8] {
        &mut self.content
    }

    pub fn into_parts(self) -> (Nonce<A>, Vec<u8>) {
        (self.nonce, self.content)
    }

    /// Splits a combined ciphertext into its payload and trailing tag.
    ///
    /// Fails with [`AeadError::DecryptionFailed`] if the content is shorter than a tag.
    pub fn split_tag(self) -> Result<(Ciphertext<A>, AuthTag<A>)> {
        let (nonce, mut content) = self.into_parts();
        let payload_len = payload_len::<A>(content.len())?;
        let tag = content.split_off(payload_len);

        Ok((Ciphertext::new(nonce, content), AuthTag::from(tag)))
    }

    /// Serializes as `nonce || content`
    pub fn to_bytes(&self) -> Vec<u8> {
        [self.nonce.as_bytes(), self.content.as_slice()].concat()
    }

    /// Parses `nonce || content` as written by [`Ciphertext::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let nonce_len = A::params().nonce_len;
        if bytes.len() < nonce_len {
            return Err(AeadError::InvalidNonceLength {
                expected: nonce_len,
                actual: bytes.len(),
            });
        }

        let (nonce, content) = bytes.split_at(nonce_len);
        Ok(Self::new(Nonce::try_from(nonce)?, content.to_vec()))
    }
}

/// Authentication tag of a detached encryption
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthTag<A: AeadAlgorithm> {
    bytes: Vec<u8>,
    _algorithm: PhantomData<A>,
}

impl<A: AeadAlgorithm> AuthTag<A> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn ensure_valid_len(&self) -> Result<()> {
        ensure_tag_len::<A>(self.bytes.len())
    }
}

/// Not validated, the length is checked when the tag is used for decryption
impl<A: AeadAlgorithm> From<Vec<u8>> for AuthTag<A> {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            _algorithm: PhantomData,
        }
    }
}

impl<A: AeadAlgorithm> From<&[u8]> for AuthTag<A> {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl<A: AeadAlgorithm> AsRef<[u8]> for AuthTag<A> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fails with [`AeadError::InvalidAuthTagLength`] unless `len` is the tag length of `A`
pub(crate) fn ensure_tag_len<A: AeadAlgorithm>(len: usize) -> Result<()> {
    let expected = A::params().tag_len;
    if len != expected {
        return Err(AeadError::InvalidAuthTagLength {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Length of the payload within a combined content of `content_len` bytes.
///
/// Too short input is reported like any other decryption failure.
pub(crate) fn payload_len<A: AeadAlgorithm>(content_len: usize) -> Result<usize> {
    content_len
        .checked_sub(A::params().tag_len)
        .ok_or(AeadError::DecryptionFailed)
}
