//! # aeadkit
//! One AEAD interface (AES-128-GCM, AES-256-GCM, ChaCha20-Poly1305) over interchangeable crypto
//! backends. Keys, nonces and ciphertexts are tagged with their algorithm at compile time, the
//! backend is picked at configuration time through [`AeadConfig`].
//!
//! ```
//! use aeadkit::{Aead, Aes256Gcm, BackendKind};
//!
//! let aead = Aead::<Aes256Gcm>::new(BackendKind::default())?;
//! let key = aead.generate_key()?;
//! let ciphertext = aead.encrypt_with_aad(b"hello", &key, aead.generate_nonce()?, b"header")?;
//! assert_eq!(aead.decrypt_with_aad(&ciphertext, &key, b"header")?, b"hello");
//! # Ok::<(), aeadkit::error::AeadError>(())
//! ```
//!
//! # Optional features
//!
//! Several backends may be compiled in at the same time, at least one is required.
//!
//! - **`ring`** *(enabled by default)* — Uses the [ring](https://crates.io/crates/ring) library,
//!   each operation is a single call into ring.
//! - **`openssl`** *(enabled by default)* — Uses the [rust-openssl](https://crates.io/crates/openssl)
//!   crate. Cipher contexts are expensive to set up and are reused through a bounded [`pool::HandlePool`].
//!   Per default the OpenSSL library is locally compiled and then statically linked. The build process
//!   requires a C compiler, `perl` (and `perl-core`), and `make`.
//! - **`rust-crypto`** — Uses the pure Rust [RustCrypto](https://github.com/RustCrypto/AEADs) implementations.

#![deny(clippy::missing_panics_doc)]
#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
#![warn(
    // missing_docs,
    clippy::doc_markdown,
    clippy::semicolon_if_nothing_returned,
    clippy::single_match_else,
    clippy::inconsistent_struct_constructor,
    clippy::map_unwrap_or,
    clippy::match_same_arms
)]

mod crypto;

/// the backend agnostic cipher and its configuration
pub mod aead;
/// byte layout of combined and detached ciphertexts
pub mod ciphertext;
/// deferred execution of cipher operations
pub mod deferred;
/// error definitions
pub mod error;
/// key and nonce material
pub mod key;
pub mod pool;

pub use aead::{Aead, AeadConfig, BackendKind, DeferredAead, DEFAULT_POOL_CAPACITY};
pub use ciphertext::{AuthTag, Ciphertext};
pub use crypto::{
    aead::AeadBackend,
    algorithm::{AeadAlgorithm, Aes128Gcm, Aes256Gcm, Algorithm, AlgorithmParams, ChaCha20Poly1305},
};
pub use key::{Key, Nonce};

/// backend implementations, usable directly or through [`Aead::with_backend`]
pub mod backend {
    #[cfg(feature = "openssl")]
    pub use crate::crypto::openssl::OpensslAead;
    #[cfg(feature = "ring")]
    pub use crate::crypto::ring::RingAead;
    #[cfg(feature = "rust-crypto")]
    pub use crate::crypto::rust_crypto::RustCryptoAead;
}

#[cfg(test)]
mod util;
