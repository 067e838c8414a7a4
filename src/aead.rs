use std::sync::Arc;

use crate::{
    ciphertext::{payload_len, AuthTag, Ciphertext},
    crypto::{aead::AeadBackend, algorithm::AeadAlgorithm},
    deferred::Deferred,
    error::{AeadError, Result},
    key::{Key, Nonce},
};

/// Number of idle cipher handles a pool keeps if not configured otherwise
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Crypto library performing the actual AEAD operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// [ring](https://crates.io/crates/ring), feature `ring`
    Ring,
    /// [rust-openssl](https://crates.io/crates/openssl) with pooled cipher contexts, feature `openssl`
    Openssl,
    /// [RustCrypto](https://github.com/RustCrypto/AEADs), feature `rust-crypto`
    RustCrypto,
}

impl Default for BackendKind {
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "ring")] {
                BackendKind::Ring
            } else if #[cfg(feature = "openssl")] {
                BackendKind::Openssl
            } else {
                BackendKind::RustCrypto
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadConfig {
    pub backend: BackendKind,
    /// Upper bound of idle handles per pool, only used by backends which pool handles
    pub pool_capacity: usize,
}

impl Default for AeadConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

impl AeadConfig {
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }
}

/// Backend agnostic AEAD cipher for algorithm `A`.
///
/// All length validation and buffer layout happens here, the configured backend only fills
/// buffers of the exact final size. Cloning is cheap and clones share the backend.
///
/// Every nonce must be unique per key. [`Aead::generate_nonce`] draws random nonces but does
/// not keep track of nonces already used.
#[derive(Debug, Clone)]
pub struct Aead<A: AeadAlgorithm> {
    backend: Arc<dyn AeadBackend<A>>,
}

impl<A: AeadAlgorithm> Aead<A> {
    pub fn new(backend: BackendKind) -> Result<Self> {
        Self::from_config(&AeadConfig::default().with_backend(backend))
    }

    pub fn from_config(config: &AeadConfig) -> Result<Self> {
        let backend: Arc<dyn AeadBackend<A>> = match config.backend {
            #[cfg(feature = "ring")]
            BackendKind::Ring => Arc::new(crate::crypto::ring::RingAead::<A>::new()),
            #[cfg(feature = "openssl")]
            BackendKind::Openssl => Arc::new(
                crate::crypto::openssl::OpensslAead::<A>::with_pool_capacity(
                    config.pool_capacity,
                ),
            ),
            #[cfg(feature = "rust-crypto")]
            BackendKind::RustCrypto => {
                Arc::new(crate::crypto::rust_crypto::RustCryptoAead::<A>::new())
            }
            #[allow(unreachable_patterns)]
            unavailable => return Err(AeadError::BackendUnavailable(unavailable)),
        };

        log::debug!(
            "Configured {} with backend {:?}",
            A::ALGORITHM,
            config.backend
        );
        Ok(Self { backend })
    }

    pub fn with_backend<B>(backend: B) -> Self
    where
        B: AeadBackend<A> + 'static,
    {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Entry points returning [`Deferred`] operations instead of running them
    pub fn deferred(&self) -> DeferredAead<A> {
        DeferredAead { aead: self.clone() }
    }

    pub fn generate_key(&self) -> Result<Key<A>> {
        Key::random_with(|buf| self.backend.fill_random(buf))
    }

    /// Fails with [`AeadError::InvalidKeyLength`] unless `bytes` has the key length of `A`
    pub fn build_key<K: AsRef<[u8]>>(&self, bytes: K) -> Result<Key<A>> {
        Key::try_from(bytes.as_ref())
    }

    pub fn generate_nonce(&self) -> Result<Nonce<A>> {
        Nonce::random_with(|buf| self.backend.fill_random(buf))
    }

    pub fn encrypt(
        &self,
        plaintext: &[u8],
        key: &Key<A>,
        nonce: Nonce<A>,
    ) -> Result<Ciphertext<A>> {
        self.encrypt_with_aad(plaintext, key, nonce, &[])
    }

    pub fn decrypt(&self, ciphertext: &Ciphertext<A>, key: &Key<A>) -> Result<Vec<u8>> {
        self.decrypt_with_aad(ciphertext, key, &[])
    }

    pub fn encrypt_detached(
        &self,
        plaintext: &[u8],
        key: &Key<A>,
        nonce: Nonce<A>,
    ) -> Result<(Ciphertext<A>, AuthTag<A>)> {
        self.encrypt_with_aad_detached(plaintext, key, nonce, &[])
    }

    pub fn decrypt_detached(
        &self,
        ciphertext: &Ciphertext<A>,
        key: &Key<A>,
        tag: &AuthTag<A>,
    ) -> Result<Vec<u8>> {
        self.decrypt_with_aad_detached(ciphertext, key, tag, &[])
    }

    /// Encrypts `plaintext` and authenticates `aad`, the content is `payload || tag`
    pub fn encrypt_with_aad(
        &self,
        plaintext: &[u8],
        key: &Key<A>,
        nonce: Nonce<A>,
        aad: &[u8],
    ) -> Result<Ciphertext<A>> {
        let content_len = plaintext.len() + A::params().tag_len;
        log::trace!("Allocating {content_len} bytes for {} ciphertext", A::ALGORITHM);

        let mut content = vec![0u8; content_len];
        self.backend.seal(key, &nonce, aad, plaintext, &mut content)?;

        Ok(Ciphertext::new(nonce, content))
    }

    /// Fails with [`AeadError::DecryptionFailed`] if the content is shorter than a tag,
    /// was altered, or `aad` differs from the one used for encryption
    pub fn decrypt_with_aad(
        &self,
        ciphertext: &Ciphertext<A>,
        key: &Key<A>,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let content = ciphertext.content();
        let plaintext_len = payload_len::<A>(content.len())?;
        log::trace!("Allocating {plaintext_len} bytes for {} plaintext", A::ALGORITHM);

        let mut plaintext = vec![0u8; plaintext_len];
        self.backend
            .open(key, ciphertext.nonce(), aad, content, &mut plaintext)?;

        Ok(plaintext)
    }

    pub fn encrypt_with_aad_detached(
        &self,
        plaintext: &[u8],
        key: &Key<A>,
        nonce: Nonce<A>,
        aad: &[u8],
    ) -> Result<(Ciphertext<A>, AuthTag<A>)> {
        let mut content = vec![0u8; plaintext.len()];
        let mut tag = vec![0u8; A::params().tag_len];
        self.backend
            .seal_detached(key, &nonce, aad, plaintext, &mut content, &mut tag)?;

        Ok((Ciphertext::new(nonce, content), AuthTag::from(tag)))
    }

    /// Fails with [`AeadError::InvalidAuthTagLength`] before touching the backend if `tag` has
    /// the wrong length
    pub fn decrypt_with_aad_detached(
        &self,
        ciphertext: &Ciphertext<A>,
        key: &Key<A>,
        tag: &AuthTag<A>,
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        tag.ensure_valid_len()?;

        let content = ciphertext.content();
        let mut plaintext = vec![0u8; content.len()];
        self.backend.open_detached(
            key,
            ciphertext.nonce(),
            aad,
            content,
            tag.as_bytes(),
            &mut plaintext,
        )?;

        Ok(plaintext)
    }
}

/// Same operations as [`Aead`], returned as [`Deferred`] computations.
///
/// Inputs are copied into the operation so it can be moved to another thread.
#[derive(Debug, Clone)]
pub struct DeferredAead<A: AeadAlgorithm> {
    aead: Aead<A>,
}

impl<A: AeadAlgorithm> DeferredAead<A> {
    pub fn generate_key(&self) -> Deferred<Key<A>> {
        let aead = self.aead.clone();
        Deferred::new(move || aead.generate_key())
    }

    pub fn build_key<K: Into<Vec<u8>>>(&self, bytes: K) -> Deferred<Key<A>> {
        let bytes = bytes.into();
        Deferred::new(move || Key::try_from(bytes))
    }

    pub fn generate_nonce(&self) -> Deferred<Nonce<A>> {
        let aead = self.aead.clone();
        Deferred::new(move || aead.generate_nonce())
    }

    pub fn encrypt<P: Into<Vec<u8>>>(
        &self,
        plaintext: P,
        key: Key<A>,
        nonce: Nonce<A>,
    ) -> Deferred<Ciphertext<A>> {
        self.encrypt_with_aad(plaintext, key, nonce, Vec::new())
    }

    pub fn decrypt(&self, ciphertext: Ciphertext<A>, key: Key<A>) -> Deferred<Vec<u8>> {
        self.decrypt_with_aad(ciphertext, key, Vec::new())
    }

    pub fn encrypt_detached<P: Into<Vec<u8>>>(
        &self,
        plaintext: P,
        key: Key<A>,
        nonce: Nonce<A>,
    ) -> Deferred<(Ciphertext<A>, AuthTag<A>)> {
        self.encrypt_with_aad_detached(plaintext, key, nonce, Vec::new())
    }

    pub fn decrypt_detached(
        &self,
        ciphertext: Ciphertext<A>,
        key: Key<A>,
        tag: AuthTag<A>,
    ) -> Deferred<Vec<u8>> {
        self.decrypt_with_aad_detached(ciphertext, key, tag, Vec::new())
    }

    pub fn encrypt_with_aad<P, D>(
        &self,
        plaintext: P,
        key: Key<A>,
        nonce: Nonce<A>,
        aad: D,
    ) -> Deferred<Ciphertext<A>>
    where
        P: Into<Vec<u8>>,
        D: Into<Vec<u8>>,
    {
        let aead = self.aead.clone();
        let (plaintext, aad) = (plaintext.into(), aad.into());
        Deferred::new(move || aead.encrypt_with_aad(&plaintext, &key, nonce, &aad))
    }

    pub fn decrypt_with_aad<D: Into<Vec<u8>>>(
        &self,
        ciphertext: Ciphertext<A>,
        key: Key<A>,
        aad: D,
    ) -> Deferred<Vec<u8>> {
        let aead = self.aead.clone();
        let aad = aad.into();
        Deferred::new(move || aead.decrypt_with_aad(&ciphertext, &key, &aad))
    }

    pub fn encrypt_with_aad_detached<P, D>(
        &self,
        plaintext: P,
        key: Key<A>,
        nonce: Nonce<A>,
        aad: D,
    ) -> Deferred<(Ciphertext<A>, AuthTag<A>)>
    where
        P: Into<Vec<u8>>,
        D: Into<Vec<u8>>,
    {
        let aead = self.aead.clone();
        let (plaintext, aad) = (plaintext.into(), aad.into());
        Deferred::new(move || aead.encrypt_with_aad_detached(&plaintext, &key, nonce, &aad))
    }

    pub fn decrypt_with_aad_detached<D: Into<Vec<u8>>>(
        &self,
        ciphertext: Ciphertext<A>,
        key: Key<A>,
        tag: AuthTag<A>,
        aad: D,
    ) -> Deferred<Vec<u8>> {
        let aead = self.aead.clone();
        let aad = aad.into();
        Deferred::new(move || aead.decrypt_with_aad_detached(&ciphertext, &key, &tag, &aad))
    }
}

#[cfg(test)]
mod test {
    use super::{Aead, AeadConfig, BackendKind, DEFAULT_POOL_CAPACITY};
    use crate::{
        ciphertext::{AuthTag, Ciphertext},
        crypto::{aead::AeadBackend, algorithm::Aes128Gcm},
        error::{AeadError, Result},
        key::{Key, Nonce},
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    /// Records buffer sizes handed to the backend, "encrypts" by copying
    #[derive(Debug, Default)]
    struct RecordingBackend {
        calls: Arc<AtomicUsize>,
    }

    impl RecordingBackend {
        fn record(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl AeadBackend<Aes128Gcm> for RecordingBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::RustCrypto
        }

        fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
            dest.fill(1);
            Ok(())
        }

        fn seal(
            &self,
            _key: &Key<Aes128Gcm>,
            _nonce: &Nonce<Aes128Gcm>,
            _aad: &[u8],
            plaintext: &[u8],
            out: &mut [u8],
        ) -> Result<()> {
            self.record();
            assert_eq!(out.len(), plaintext.len() + 16);
            out[..plaintext.len()].copy_from_slice(plaintext);
            Ok(())
        }

        fn seal_detached(
            &self,
            _key: &Key<Aes128Gcm>,
            _nonce: &Nonce<Aes128Gcm>,
            _aad: &[u8],
            plaintext: &[u8],
            out: &mut [u8],
            tag: &mut [u8],
        ) -> Result<()> {
            self.record();
            assert_eq!(out.len(), plaintext.len());
            assert_eq!(tag.len(), 16);
            out.copy_from_slice(plaintext);
            Ok(())
        }

        fn open(
            &self,
            _key: &Key<Aes128Gcm>,
            _nonce: &Nonce<Aes128Gcm>,
            _aad: &[u8],
            ciphertext_and_tag: &[u8],
            out: &mut [u8],
        ) -> Result<()> {
            self.record();
            assert_eq!(out.len() + 16, ciphertext_and_tag.len());
            out.copy_from_slice(&ciphertext_and_tag[..out.len()]);
            Ok(())
        }

        fn open_detached(
            &self,
            _key: &Key<Aes128Gcm>,
            _nonce: &Nonce<Aes128Gcm>,
            _aad: &[u8],
            ciphertext: &[u8],
            tag: &[u8],
            out: &mut [u8],
        ) -> Result<()> {
            self.record();
            assert_eq!(out.len(), ciphertext.len());
            assert_eq!(tag.len(), 16);
            out.copy_from_slice(ciphertext);
            Ok(())
        }
    }

    fn recording_aead() -> (Aead<Aes128Gcm>, Arc<AtomicUsize>) {
        let backend = RecordingBackend::default();
        let calls = backend.calls.clone();
        (Aead::with_backend(backend), calls)
    }

    fn key() -> Key<Aes128Gcm> {
        Key::try_from(vec![0u8; 16]).unwrap()
    }

    #[test]
    fn allocates_exact_buffers() {
        let (aead, calls) = recording_aead();
        let nonce = aead.generate_nonce().unwrap();

        let ciphertext = aead.encrypt(b"hello", &key(), nonce.clone()).unwrap();
        assert_eq!(ciphertext.content().len(), 5 + 16);
        assert_eq!(aead.decrypt(&ciphertext, &key()).unwrap(), b"hello");

        let (ciphertext, tag) = aead.encrypt_detached(b"hello", &key(), nonce).unwrap();
        assert_eq!(ciphertext.content().len(), 5);
        assert_eq!(tag.len(), 16);
        assert_eq!(
            aead.decrypt_detached(&ciphertext, &key(), &tag).unwrap(),
            b"hello"
        );

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn rejects_wrong_tag_length_before_backend_call() {
        let (aead, calls) = recording_aead();
        let ciphertext = Ciphertext::new(aead.generate_nonce().unwrap(), vec![0u8; 5]);

        for len in [0, 15, 17, 32] {
            let tag = AuthTag::from(vec![0u8; len]);
            assert_eq!(
                aead.decrypt_detached(&ciphertext, &key(), &tag),
                Err(AeadError::InvalidAuthTagLength {
                    expected: 16,
                    actual: len
                })
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejects_content_shorter_than_tag_before_backend_call() {
        let (aead, calls) = recording_aead();
        let ciphertext = Ciphertext::new(aead.generate_nonce().unwrap(), vec![0u8; 15]);

        assert_eq!(
            aead.decrypt(&ciphertext, &key()),
            Err(AeadError::DecryptionFailed)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn generates_key_and_nonce_from_backend_source() {
        let (aead, _) = recording_aead();
        assert_eq!(aead.generate_key().unwrap().as_bytes(), &[1u8; 16]);
        assert_eq!(aead.generate_nonce().unwrap().as_bytes(), &[1u8; 12]);
    }

    #[test]
    fn deferred_calls_share_facade_validation() {
        let (aead, calls) = recording_aead();
        let ciphertext = Ciphertext::new(aead.generate_nonce().unwrap(), vec![0u8; 5]);

        let deferred = aead.deferred().decrypt_detached(
            ciphertext,
            key(),
            AuthTag::from(vec![0u8; 3]),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            deferred.run(),
            Err(AeadError::InvalidAuthTagLength {
                expected: 16,
                actual: 3
            })
        );
    }

    #[test]
    fn config_defaults() {
        let config = AeadConfig::default();
        assert_eq!(config.pool_capacity, DEFAULT_POOL_CAPACITY);
        assert_eq!(config.backend, BackendKind::default());

        let config = config
            .with_backend(BackendKind::Openssl)
            .with_pool_capacity(2);
        assert_eq!(config.backend, BackendKind::Openssl);
        assert_eq!(config.pool_capacity, 2);
    }

    #[cfg(feature = "ring")]
    #[test]
    fn ring_is_preferred_default_backend() {
        assert_eq!(BackendKind::default(), BackendKind::Ring);
    }

    #[cfg(not(feature = "rust-crypto"))]
    #[test]
    fn reports_backend_not_compiled_in() {
        assert_eq!(
            Aead::<Aes128Gcm>::new(BackendKind::RustCrypto).err(),
            Some(AeadError::BackendUnavailable(BackendKind::RustCrypto))
        );
    }
}
