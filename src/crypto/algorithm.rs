use std::fmt;

/// Depicts which AEAD algorithm is used for encryption
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u16)]
pub enum Algorithm {
    /// AES GCM with a 128 bit key
    Aes128Gcm = 0x0001,
    /// AES GCM with a 256 bit key
    Aes256Gcm = 0x0002,
    /// ChaCha20-Poly1305 as of RFC 8439
    ChaCha20Poly1305 = 0x0003,
}

/// Byte lengths of the key, nonce and authentication tag of an [`Algorithm`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AlgorithmParams {
    pub algorithm: Algorithm,
    pub key_len: usize,
    pub nonce_len: usize,
    pub tag_len: usize,
}

static AES_128_GCM: AlgorithmParams = AlgorithmParams {
    algorithm: Algorithm::Aes128Gcm,
    key_len: 16,
    nonce_len: 12,
    tag_len: 16,
};

static AES_256_GCM: AlgorithmParams = AlgorithmParams {
    algorithm: Algorithm::Aes256Gcm,
    key_len: 32,
    nonce_len: 12,
    tag_len: 16,
};

static CHACHA20_POLY1305: AlgorithmParams = AlgorithmParams {
    algorithm: Algorithm::ChaCha20Poly1305,
    key_len: 32,
    nonce_len: 12,
    tag_len: 16,
};

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Aes128Gcm,
        Algorithm::Aes256Gcm,
        Algorithm::ChaCha20Poly1305,
    ];

    pub fn params(self) -> &'static AlgorithmParams {
        match self {
            Algorithm::Aes128Gcm => &AES_128_GCM,
            Algorithm::Aes256Gcm => &AES_256_GCM,
            Algorithm::ChaCha20Poly1305 => &CHACHA20_POLY1305,
        }
    }
}

impl From<Algorithm> for &'static AlgorithmParams {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.params()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Aes128Gcm => "AES-128-GCM",
            Algorithm::Aes256Gcm => "AES-256-GCM",
            Algorithm::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        };
        f.write_str(name)
    }
}

/// Compile time tag of an [`Algorithm`].
///
/// Keys, nonces and ciphertexts carry this tag as a phantom type parameter,
/// so material of one algorithm cannot be handed to a cipher of another one.
/// Only lengths are checked at runtime.
pub trait AeadAlgorithm: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    const ALGORITHM: Algorithm;

    fn params() -> &'static AlgorithmParams {
        Self::ALGORITHM.params()
    }
}

/// AES GCM with a 128 bit key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aes128Gcm;

/// AES GCM with a 256 bit key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aes256Gcm;

/// ChaCha20-Poly1305 with a 256 bit key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChaCha20Poly1305;

impl AeadAlgorithm for Aes128Gcm {
    const ALGORITHM: Algorithm = Algorithm::Aes128Gcm;
}

impl AeadAlgorithm for Aes256Gcm {
    const ALGORITHM: Algorithm = Algorithm::Aes256Gcm;
}

impl AeadAlgorithm for ChaCha20Poly1305 {
    const ALGORITHM: Algorithm = Algorithm::ChaCha20Poly1305;
}
