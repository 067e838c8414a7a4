use openssl::error::ErrorStack;

use super::OpensslAead;
use crate::{
    aead::BackendKind,
    crypto::{
        aead::{
            check_open_buffers, check_open_detached_buffers, check_seal_buffers,
            check_seal_detached_buffers, AeadBackend,
        },
        algorithm::AeadAlgorithm,
    },
    error::{AeadError, Result},
    key::{Key, Nonce},
};

impl<A: AeadAlgorithm> OpensslAead<A> {
    /// Encrypts `plaintext` and writes `encrypted || tag` to `out`,
    /// the concatenated form the EVP interface produces.
    fn seal_combined(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        check_seal_buffers::<A>(plaintext, out)?;
        let (encrypted, tag) = out.split_at_mut(plaintext.len());
        let mut ctx = self.encrypt_pool.acquire()?;

        ctx.encrypt_init(None, Some(key.as_bytes()), Some(nonce.as_bytes()))?;
        if !aad.is_empty() {
            ctx.cipher_update(aad, None)?;
        }
        let written = ctx.cipher_update(plaintext, Some(&mut *encrypted))?;
        ctx.cipher_final(&mut encrypted[written..])?;
        ctx.tag(tag)?;

        Ok(())
    }

    /// Decrypts `encrypted || tag` into `out`, which holds no data if the tag does not verify.
    fn open_combined(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext_and_tag: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        check_open_buffers::<A>(ciphertext_and_tag, out)?;
        let (encrypted, tag) = ciphertext_and_tag.split_at(out.len());
        let mut ctx = self.decrypt_pool.acquire()?;

        let result = (|| -> std::result::Result<(), ErrorStack> {
            ctx.decrypt_init(None, Some(key.as_bytes()), Some(nonce.as_bytes()))?;
            if !aad.is_empty() {
                ctx.cipher_update(aad, None)?;
            }
            let written = ctx.cipher_update(encrypted, Some(&mut *out))?;
            ctx.set_tag(tag)?;
            ctx.cipher_final(&mut out[written..])?;
            Ok(())
        })();

        result.map_err(|err| {
            log::debug!("Decryption failed, OpenSSL error stack: {err}");
            out.fill(0);
            AeadError::DecryptionFailed
        })
    }
}

impl<A: AeadAlgorithm> AeadBackend<A> for OpensslAead<A> {
    fn kind(&self) -> BackendKind {
        BackendKind::Openssl
    }

    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        openssl::rand::rand_bytes(dest).map_err(|err| {
            log::debug!("Random generation failed, OpenSSL error stack: {err}");
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
        self.seal_combined(key, nonce, aad, plaintext, out)
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
        let mut combined = vec![0u8; plaintext.len() + tag.len()];
        self.seal_combined(key, nonce, aad, plaintext, &mut combined)?;

        let (encrypted, computed_tag) = combined.split_at(plaintext.len());
        out.copy_from_slice(encrypted);
        tag.copy_from_slice(computed_tag);

        Ok(())
    }

    fn open(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext_and_tag: &[u8],
        out: &mut [u8],
    ) -> Result<()> {
        self.open_combined(key, nonce, aad, ciphertext_and_tag, out)
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
        let spliced = splice_tag(ciphertext, tag);
        self.open_combined(key, nonce, aad, &spliced, out)
    }
}

fn splice_tag(ciphertext: &[u8], tag: &[u8]) -> Vec<u8> {
    let mut spliced = Vec::with_capacity(ciphertext.len() + tag.len());
    spliced.extend_from_slice(ciphertext);
    spliced.extend_from_slice(tag);
    spliced
}

impl From<ErrorStack> for AeadError {
    fn from(err: ErrorStack) -> Self {
        log::debug!("Encryption failed, OpenSSL error stack: {err}");
        AeadError::EncryptionFailed
    }
}
