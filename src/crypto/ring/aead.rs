use ring::{
    aead::{Aad, LessSafeKey, Nonce as RingNonce, Tag, UnboundKey},
    rand::SecureRandom,
};

use super::RingAead;
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

impl<A: AeadAlgorithm> RingAead<A> {
    fn less_safe_key(&self, key: &Key<A>, on_error: AeadError) -> Result<LessSafeKey> {
        let unbound = UnboundKey::new(self.algorithm, key.as_bytes()).map_err(move |_| {
            log::debug!("ring rejected a {} key", A::ALGORITHM);
            on_error
        })?;
        Ok(LessSafeKey::new(unbound))
    }

    fn seal_into(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        in_out: &mut [u8],
    ) -> Result<Tag> {
        let sealing_key = self.less_safe_key(key, AeadError::EncryptionFailed)?;
        let nonce = RingNonce::try_assume_unique_for_key(nonce.as_bytes())
            .map_err(|_| AeadError::EncryptionFailed)?;

        sealing_key
            .seal_in_place_separate_tag(nonce, Aad::from(aad), in_out)
            .map_err(|_| {
                log::debug!("ring failed to seal with {}", A::ALGORITHM);
                AeadError::EncryptionFailed
            })
    }

    fn open_into(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        tag: &[u8],
        in_out: &mut [u8],
    ) -> Result<()> {
        let opening_key = self.less_safe_key(key, AeadError::DecryptionFailed)?;
        let nonce = RingNonce::try_assume_unique_for_key(nonce.as_bytes())
            .map_err(|_| AeadError::DecryptionFailed)?;
        let tag = Tag::try_from(tag).map_err(|_| AeadError::DecryptionFailed)?;

        opening_key
            .open_in_place_separate_tag(nonce, Aad::from(aad), tag, in_out, 0..)
            .map_err(|_| {
                log::debug!("ring failed to open with {}", A::ALGORITHM);
                AeadError::DecryptionFailed
            })?;

        Ok(())
    }
}

impl<A: AeadAlgorithm> AeadBackend<A> for RingAead<A> {
    fn kind(&self) -> BackendKind {
        BackendKind::Ring
    }

    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .fill(dest)
            .map_err(|_| AeadError::RandomGenerationFailed)
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
        let (payload, tag_out) = out.split_at_mut(plaintext.len());
        payload.copy_from_slice(plaintext);

        let tag = self.seal_into(key, nonce, aad, payload)?;
        tag_out.copy_from_slice(tag.as_ref());

        Ok(())
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

        let computed = self.seal_into(key, nonce, aad, out)?;
        tag.copy_from_slice(computed.as_ref());

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
        check_open_buffers::<A>(ciphertext_and_tag, out)?;
        let (encrypted, tag) = ciphertext_and_tag.split_at(out.len());
        out.copy_from_slice(encrypted);

        self.open_into(key, nonce, aad, tag, out)
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

        self.open_into(key, nonce, aad, tag, out)
    }
}
