pub mod aead;
pub mod algorithm;

#[cfg(feature = "openssl")]
pub mod openssl;
#[cfg(feature = "ring")]
pub mod ring;
#[cfg(feature = "rust-crypto")]
pub mod rust_crypto;

#[cfg(not(any(feature = "ring", feature = "openssl", feature = "rust-crypto")))]
compile_error!("At least one crypto backend feature (ring, openssl, rust-crypto) has to be enabled.");
