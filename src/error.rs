use crate::aead::BackendKind;

/// Represents either success(T) or an failure ([`AeadError`])
pub type Result<T> = std::result::Result<T, AeadError>;

/// Represents an error which has occured in the aeadkit library
#[derive(PartialEq, Eq, Debug, thiserror::Error)]
pub enum AeadError {
    /// key bytes do not match the key length of the algorithm
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// nonce bytes do not match the nonce length of the algorithm
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// detached authentication tag does not match the tag length of the algorithm
    #[error("invalid authentication tag length: expected {expected}, got {actual}")]
    InvalidAuthTagLength { expected: usize, actual: usize },

    /// The backend failed to encrypt
    #[error("Failed to Encrypt")]
    EncryptionFailed,

    /// The backend rejected the ciphertext, either because the tag did not verify or the input was malformed
    #[error("Failed to Decrypt")]
    DecryptionFailed,

    /// A pooled cipher handle could not be constructed
    #[error("Unable to construct cipher handle: {0}")]
    HandleConstruction(String),

    /// The random source of the backend failed
    #[error("Unable to generate random bytes")]
    RandomGenerationFailed,

    /// The configured backend has not been compiled in
    #[error("Backend {0:?} is not available in this build")]
    BackendUnavailable(BackendKind),
}

impl AeadError {
    /// Only the construction of a fresh cipher handle can fail transiently,
    /// every other failure is deterministic for the given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AeadError::HandleConstruction(_))
    }
}
