//! Payload encryption capability.
//!
//! The codec never performs cryptography itself. It asks an injected
//! [`EncryptionProvider`] whether encryption is enabled and delegates the
//! plaintext/ciphertext transform to it. Implementations must be safe to
//! share across threads; the codec calls them concurrently without locking.

mod secretbox;

pub use secretbox::{SecretBoxError, SecretBoxProvider};

use crate::types::BoxError;

/// Encryption capability consumed by the codec.
#[cfg_attr(test, mockall::automock)]
pub trait EncryptionProvider: Send + Sync {
    /// Whether payload encryption is currently active. Must be cheap.
    fn is_enabled(&self) -> bool;

    /// Encrypt plaintext bytes into a text-safe ciphertext.
    fn encrypt(&self, plaintext: &[u8]) -> Result<String, BoxError>;

    /// Decrypt ciphertext text. Never returns partial output on failure.
    fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, BoxError>;
}

/// Provider that is never enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

impl EncryptionProvider for DisabledProvider {
    fn is_enabled(&self) -> bool {
        false
    }

    fn encrypt(&self, _plaintext: &[u8]) -> Result<String, BoxError> {
        Err("payload encryption is disabled".into())
    }

    fn decrypt(&self, _ciphertext: &str) -> Result<Vec<u8>, BoxError> {
        Err("payload encryption is disabled".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_provider_refuses_work() {
        let provider = DisabledProvider;
        assert!(!provider.is_enabled());
        assert!(provider.encrypt(b"{}").is_err());
        assert!(provider.decrypt("AAAA").is_err());
    }
}
