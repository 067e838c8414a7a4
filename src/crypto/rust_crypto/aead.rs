//! AEAD implementation for RustCrypto backend.

use aes_gcm::{
    aead::{generic_array::GenericArray, AeadCore, AeadInPlace, KeyInit},
    Aes128Gcm as RcAes128Gcm, Aes256Gcm as RcAes256Gcm,
};
use chacha20poly1305::ChaCha20Poly1305 as RcChaCha20Poly1305;

use super::RustCryptoAead;
use crate::{
    aead::BackendKind,
    crypto::{
        aead::{
            check_open_buffers, check_open_detached_buffers, check_seal_buffers,
            check_seal_detached_buffers, AeadBackend,
        },
        algorithm::{AeadAlgorithm, Algorithm},
    },
    error::{AeadError, Result},
    key::{Key, Nonce},
};

impl<A: AeadAlgorithm> RustCryptoAead<A> {
    fn seal_in_place(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        in_out: &mut [u8],
        tag: &mut [u8],
    ) -> Result<()> {
        let (key, nonce) = (key.as_bytes(), nonce.as_bytes());
        match A::ALGORITHM {
            Algorithm::Aes128Gcm => {
                encrypt_in_place_detached::<RcAes128Gcm>(key, nonce, aad, in_out, tag)
            }
            Algorithm::Aes256Gcm => {
                encrypt_in_place_detached::<RcAes256Gcm>(key, nonce, aad, in_out, tag)
            }
            Algorithm::ChaCha20Poly1305 => {
                encrypt_in_place_detached::<RcChaCha20Poly1305>(key, nonce, aad, in_out, tag)
            }
        }
    }

    fn open_in_place(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        in_out: &mut [u8],
        tag: &[u8],
    ) -> Result<()> {
        let (key, nonce) = (key.as_bytes(), nonce.as_bytes());
        match A::ALGORITHM {
            Algorithm::Aes128Gcm => {
                decrypt_in_place_detached::<RcAes128Gcm>(key, nonce, aad, in_out, tag)
            }
            Algorithm::Aes256Gcm => {
                decrypt_in_place_detached::<RcAes256Gcm>(key, nonce, aad, in_out, tag)
            }
            Algorithm::ChaCha20Poly1305 => {
                decrypt_in_place_detached::<RcChaCha20Poly1305>(key, nonce, aad, in_out, tag)
            }
        }
    }
}

fn encrypt_in_place_detached<C>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    in_out: &mut [u8],
    tag: &mut [u8],
) -> Result<()>
where
    C: AeadInPlace + AeadCore + KeyInit,
{
    let algo = C::new_from_slice(key).map_err(|err| {
        log::debug!("Invalid key: {err}");
        AeadError::EncryptionFailed
    })?;
    let computed = algo
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, in_out)
        .map_err(|err| {
            log::debug!("Encryption failed: {err}");
            AeadError::EncryptionFailed
        })?;
    tag.copy_from_slice(computed.as_slice());

    Ok(())
}

fn decrypt_in_place_detached<C>(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    in_out: &mut [u8],
    tag: &[u8],
) -> Result<()>
where
    C: AeadInPlace + AeadCore + KeyInit,
{
    let algo = C::new_from_slice(key).map_err(|err| {
        log::debug!("Invalid key: {err}");
        AeadError::DecryptionFailed
    })?;
    algo.decrypt_in_place_detached(
        GenericArray::from_slice(nonce),
        aad,
        in_out,
        GenericArray::from_slice(tag),
    )
    .map_err(|err| {
        log::debug!("Decryption failed: {err}");
        AeadError::DecryptionFailed
    })
}

impl<A: AeadAlgorithm> AeadBackend<A> for RustCryptoAead<A> {
    fn kind(&self) -> BackendKind {
        BackendKind::RustCrypto
    }

    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        getrandom::getrandom(dest).map_err(|err| {
            log::debug!("Random generation failed: {err}");
            AeadError::RandomGenerationFailed
        })
    }

    fn seal(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        check_seal_buffers::<A>(plaintext, out)?;
        let (payload, tag) = out.split_at_mut(plaintext.len());
        payload.copy_from_slice(plaintext);
        self.seal_in_place(key, nonce, aad, payload, tag)
    }

    fn seal_detached(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
        tag: &mut [u8],
    ) -> Result<()> {
        check_seal_detached_buffers::<A>(plaintext, out, tag)?;
        out.copy_from_slice(plaintext);
        self.seal_in_place(key, nonce, aad, out, tag)
    }

    fn open(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext_and_tag: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        check_open_buffers::<A>(ciphertext_and_tag, out)?;
        let (encrypted, tag) = ciphertext_and_tag.split_at(out.len());
        out.copy_from_slice(encrypted);
        self.open_in_place(key, nonce, aad, out, tag)
    }

    fn open_detached(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        check_open_detached_buffers::<A>(ciphertext, tag, out)?;
        out.copy_from_slice(ciphertext);
        self.open_in_place(key, nonce, aad, out, tag)
    }
}
