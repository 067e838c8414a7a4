use std::fmt::Debug;

use crate::{
    aead::BackendKind,
    ciphertext::{ensure_tag_len, payload_len},
    crypto::algorithm::AeadAlgorithm,
    error::{AeadError, Result},
    key::{Key, Nonce},
};

/// Buffer level AEAD primitives a crypto backend provides for algorithm `A`.
///
/// Output buffers have their exact final size:
///
/// - `seal`: `out.len() == plaintext.len() + tag_len`, receives `payload || tag`
/// - `seal_detached`: `out.len() == plaintext.len()`, `tag.len() == tag_len`
/// - `open`: `out.len() == ciphertext_and_tag.len() - tag_len`
/// - `open_detached`: `out.len() == ciphertext.len()`, `tag.len() == tag_len`
///
/// Implementations check these sizes before any native call and never panic on a mismatch.
/// A wrongly sized detached tag on `open_detached` is [`AeadError::InvalidAuthTagLength`],
/// any other mismatch is [`AeadError::EncryptionFailed`] for seals and
/// [`AeadError::DecryptionFailed`] for opens. Native failures map to the same two kinds.
pub trait AeadBackend<A: AeadAlgorithm>: Debug + Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Fills `dest` from the cryptographically secure random source of the backend
    fn fill_random(&self, dest: &mut [u8]) -> Result<()>;

    fn seal(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
    ) -> Result<()>;

    fn seal_detached(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        plaintext: &[u8],
        out: &mut [u8],
        tag: &mut [u8],
    ) -> Result<()>;

    fn open(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext_and_tag: &[u8],
        out: &mut [u8],
    ) -> Result<()>;

    fn open_detached(
        &self,
        key: &Key<A>,
        nonce: &Nonce<A>,
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        out: &mut [u8],
    ) -> Result<()>;
}

pub(crate) fn check_seal_buffers<A: AeadAlgorithm>(plaintext: &[u8], out: &[u8]) -> Result<()> {
    if out.len() != plaintext.len() + A::params().tag_len {
        log::debug!(
            "{} seal: output of {} bytes for {} bytes of plaintext",
            A::ALGORITHM,
            out.len(),
            plaintext.len()
        );
        return Err(AeadError::EncryptionFailed);
    }
    Ok(())
}

pub(crate) fn check_seal_detached_buffers<A: AeadAlgorithm>(
    plaintext: &[u8],
    out: &[u8],
    tag: &[u8],
) -> Result<()> {
    if out.len() != plaintext.len() || tag.len() != A::params().tag_len {
        log::debug!(
            "{} detached seal: output of {} bytes and tag of {} bytes for {} bytes of plaintext",
            A::ALGORITHM,
            out.len(),
            tag.len(),
            plaintext.len()
        );
        return Err(AeadError::EncryptionFailed);
    }
    Ok(())
}

pub(crate) fn check_open_buffers<A: AeadAlgorithm>(
    ciphertext_and_tag: &[u8],
    out: &[u8],
) -> Result<()> {
    if payload_len::<A>(ciphertext_and_tag.len())? != out.len() {
        log::debug!(
            "{} open: output of {} bytes for {} bytes of ciphertext",
            A::ALGORITHM,
            out.len(),
            ciphertext_and_tag.len()
        );
        return Err(AeadError::DecryptionFailed);
    }
    Ok(())
}

pub(crate) fn check_open_detached_buffers<A: AeadAlgorithm>(
    ciphertext: &[u8],
    tag: &[u8],
    out: &[u8],
) -> Result<()> {
    ensure_tag_len::<A>(tag.len())?;
    if out.len() != ciphertext.len() {
        log::debug!(
            "{} detached open: output of {} bytes for {} bytes of ciphertext",
            A::ALGORITHM,
            out.len(),
            ciphertext.len()
        );
        return Err(AeadError::DecryptionFailed);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::AeadBackend;
    use crate::{
        aead::{Aead, BackendKind},
        crypto::algorithm::{AeadAlgorithm, Aes128Gcm, Aes256Gcm, ChaCha20Poly1305},
        error::AeadError,
        key::{Key, Nonce},
        util::test::{assert_bytes_eq, flip_bit},
    };
    use test_case::test_case;

    const PLAIN_TEXT: &[u8] = b"hello";

    fn zero_nonce<A: AeadAlgorithm>() -> Nonce<A> {
        Nonce::try_from(vec![0u8; A::params().nonce_len].as_slice()).unwrap()
    }

    fn encrypts_known_answer<A: AeadAlgorithm>(backend: BackendKind, aad: &[u8], expected: &str) {
        let aead = Aead::<A>::new(backend).unwrap();
        let key = aead.build_key(vec![0u8; A::params().key_len]).unwrap();

        let ciphertext = aead
            .encrypt_with_aad(PLAIN_TEXT, &key, zero_nonce(), aad)
            .unwrap();
        assert_bytes_eq(ciphertext.content(), &hex::decode(expected).unwrap());

        let (detached, tag) = aead
            .encrypt_with_aad_detached(PLAIN_TEXT, &key, zero_nonce(), aad)
            .unwrap();
        assert_bytes_eq(
            &[detached.content(), tag.as_bytes()].concat(),
            ciphertext.content(),
        );

        let decrypted = aead.decrypt_with_aad(&ciphertext, &key, aad).unwrap();
        assert_bytes_eq(&decrypted, PLAIN_TEXT);
    }

    #[cfg_attr(feature = "ring", test_case(BackendKind::Ring; "ring"))]
    #[cfg_attr(feature = "openssl", test_case(BackendKind::Openssl; "openssl"))]
    #[cfg_attr(feature = "rust-crypto", test_case(BackendKind::RustCrypto; "rust_crypto"))]
    fn matches_known_answers(backend: BackendKind) {
        encrypts_known_answer::<Aes128Gcm>(
            backend,
            b"",
            "6bedb6a20ffc05f3475d29034caa1cc8fa3628c39f",
        );
        encrypts_known_answer::<Aes256Gcm>(
            backend,
            b"",
            "a6c22c51228b908f7f62ffcea6a92fabef39bf4d93",
        );
        encrypts_known_answer::<Aes256Gcm>(
            backend,
            b"header",
            "a6c22c5122c16f483a0c2d8447e7f2fce0de6a9c7c",
        );
        encrypts_known_answer::<ChaCha20Poly1305>(
            backend,
            b"",
            "f7628bd23adce962340b6fd6a0a4d1fe736f29456f",
        );
    }

    fn rejects_every_flipped_bit<A: AeadAlgorithm>(backend: BackendKind) {
        let aead = Aead::<A>::new(backend).unwrap();
        let key = aead.generate_key().unwrap();
        let ciphertext = aead
            .encrypt_with_aad(PLAIN_TEXT, &key, aead.generate_nonce().unwrap(), b"aad")
            .unwrap();

        for bit in 0..ciphertext.content().len() * 8 {
            let mut tampered = ciphertext.clone();
            let flipped = flip_bit(ciphertext.content(), bit);
            tampered.content_mut().copy_from_slice(&flipped);

            assert_eq!(
                aead.decrypt_with_aad(&tampered, &key, b"aad"),
                Err(AeadError::DecryptionFailed),
                "bit {bit} flipped with {backend:?}"
            );
        }
    }

    #[cfg_attr(feature = "ring", test_case(BackendKind::Ring; "ring"))]
    #[cfg_attr(feature = "openssl", test_case(BackendKind::Openssl; "openssl"))]
    #[cfg_attr(feature = "rust-crypto", test_case(BackendKind::RustCrypto; "rust_crypto"))]
    fn detects_tampering(backend: BackendKind) {
        rejects_every_flipped_bit::<Aes128Gcm>(backend);
        rejects_every_flipped_bit::<Aes256Gcm>(backend);
        rejects_every_flipped_bit::<ChaCha20Poly1305>(backend);
    }

    fn backend<A: AeadAlgorithm>(kind: BackendKind) -> Box<dyn AeadBackend<A>> {
        match kind {
            #[cfg(feature = "ring")]
            BackendKind::Ring => Box::new(crate::crypto::ring::RingAead::<A>::new()),
            #[cfg(feature = "openssl")]
            BackendKind::Openssl => {
                Box::new(crate::crypto::openssl::OpensslAead::<A>::with_private_pools(1))
            }
            #[cfg(feature = "rust-crypto")]
            BackendKind::RustCrypto => {
                Box::new(crate::crypto::rust_crypto::RustCryptoAead::<A>::new())
            }
            #[allow(unreachable_patterns)]
            unavailable => panic!("{unavailable:?} is not compiled in"),
        }
    }

    fn zero_key<A: AeadAlgorithm>() -> Key<A> {
        Key::try_from(vec![0u8; A::params().key_len]).unwrap()
    }

    fn rejects_wrong_detached_tag_length<A: AeadAlgorithm>(kind: BackendKind) {
        let backend = backend::<A>(kind);
        let (key, nonce) = (zero_key::<A>(), zero_nonce::<A>());
        let tag_len = A::params().tag_len;

        let mut encrypted = vec![0u8; PLAIN_TEXT.len()];
        let mut tag = vec![0u8; tag_len];
        backend
            .seal_detached(&key, &nonce, b"", PLAIN_TEXT, &mut encrypted, &mut tag)
            .unwrap();

        for len in [0, 1, tag_len - 1] {
            let mut out = vec![0u8; PLAIN_TEXT.len()];
            assert_eq!(
                backend.open_detached(&key, &nonce, b"", &encrypted, &tag[..len], &mut out),
                Err(AeadError::InvalidAuthTagLength {
                    expected: tag_len,
                    actual: len
                }),
                "{len} byte tag with {kind:?}"
            );
            assert_eq!(out, vec![0u8; PLAIN_TEXT.len()]);
        }

        let mut longer_tag = tag.clone();
        longer_tag.push(0);
        let mut out = vec![0u8; PLAIN_TEXT.len()];
        assert_eq!(
            backend.open_detached(&key, &nonce, b"", &encrypted, &longer_tag, &mut out),
            Err(AeadError::InvalidAuthTagLength {
                expected: tag_len,
                actual: tag_len + 1
            })
        );

        backend
            .open_detached(&key, &nonce, b"", &encrypted, &tag, &mut out)
            .unwrap();
        assert_bytes_eq(&out, PLAIN_TEXT);
    }

    #[cfg_attr(feature = "ring", test_case(BackendKind::Ring; "ring"))]
    #[cfg_attr(feature = "openssl", test_case(BackendKind::Openssl; "openssl"))]
    #[cfg_attr(feature = "rust-crypto", test_case(BackendKind::RustCrypto; "rust_crypto"))]
    fn backend_rejects_wrong_tag_length(kind: BackendKind) {
        rejects_wrong_detached_tag_length::<Aes128Gcm>(kind);
        rejects_wrong_detached_tag_length::<Aes256Gcm>(kind);
        rejects_wrong_detached_tag_length::<ChaCha20Poly1305>(kind);
    }

    fn reports_wrongly_sized_buffers<A: AeadAlgorithm>(kind: BackendKind) {
        let backend = backend::<A>(kind);
        let (key, nonce) = (zero_key::<A>(), zero_nonce::<A>());
        let tag_len = A::params().tag_len;
        let len = PLAIN_TEXT.len();

        for out_len in [0, len, len + tag_len - 1, len + tag_len + 1] {
            assert_eq!(
                backend.seal(&key, &nonce, b"", PLAIN_TEXT, &mut vec![0u8; out_len]),
                Err(AeadError::EncryptionFailed),
                "seal into {out_len} bytes with {kind:?}"
            );
        }

        for (out_len, detached_tag_len) in [(len - 1, tag_len), (len, tag_len - 1), (len, 0)] {
            assert_eq!(
                backend.seal_detached(
                    &key,
                    &nonce,
                    b"",
                    PLAIN_TEXT,
                    &mut vec![0u8; out_len],
                    &mut vec![0u8; detached_tag_len]
                ),
                Err(AeadError::EncryptionFailed),
                "detached seal into {out_len} and {detached_tag_len} bytes with {kind:?}"
            );
        }

        let mut sealed = vec![0u8; len + tag_len];
        backend
            .seal(&key, &nonce, b"", PLAIN_TEXT, &mut sealed)
            .unwrap();

        for out_len in [0, len - 1, len + 1] {
            assert_eq!(
                backend.open(&key, &nonce, b"", &sealed, &mut vec![0u8; out_len]),
                Err(AeadError::DecryptionFailed),
                "open into {out_len} bytes with {kind:?}"
            );
        }
        assert_eq!(
            backend.open(&key, &nonce, b"", &sealed[..tag_len - 1], &mut []),
            Err(AeadError::DecryptionFailed)
        );

        let (encrypted, tag) = sealed.split_at(len);
        assert_eq!(
            backend.open_detached(&key, &nonce, b"", encrypted, tag, &mut vec![0u8; len + 1]),
            Err(AeadError::DecryptionFailed)
        );

        let mut out = vec![0u8; len];
        backend
            .open(&key, &nonce, b"", &sealed, &mut out)
            .unwrap();
        assert_bytes_eq(&out, PLAIN_TEXT);
    }

    #[cfg_attr(feature = "ring", test_case(BackendKind::Ring; "ring"))]
    #[cfg_attr(feature = "openssl", test_case(BackendKind::Openssl; "openssl"))]
    #[cfg_attr(feature = "rust-crypto", test_case(BackendKind::RustCrypto; "rust_crypto"))]
    fn backend_reports_wrongly_sized_buffers(kind: BackendKind) {
        reports_wrongly_sized_buffers::<Aes128Gcm>(kind);
        reports_wrongly_sized_buffers::<Aes256Gcm>(kind);
        reports_wrongly_sized_buffers::<ChaCha20Poly1305>(kind);
    }
}
