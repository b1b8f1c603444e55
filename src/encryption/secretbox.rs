//! XSalsa20-Poly1305 secretbox provider.
//!
//! Compatible with the recorder's payload encryption:
//! - Key: passphrase UTF-8 bytes, truncated or zero-padded to 32 bytes
//! - Nonce: 24 random bytes per message
//! - Wire text: standard base64 of `[ nonce (24) | ciphertext + tag (16) ]`

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_secretbox::aead::{Aead, AeadCore, KeyInit, OsRng};
use crypto_secretbox::{Key, Nonce, XSalsa20Poly1305};
use std::fmt;
use zeroize::Zeroizing;

use super::EncryptionProvider;
use crate::types::BoxError;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SecretBoxError {
    #[error("no passphrase configured")]
    NoKey,

    #[error("secretbox encryption failed")]
    Encrypt,

    #[error("secretbox authentication failed")]
    Authentication,

    #[error("ciphertext too short: {0} bytes")]
    TooShort(usize),

    #[error("invalid base64 ciphertext: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Passphrase-keyed secretbox provider. Enabled when the passphrase is non-empty.
pub struct SecretBoxProvider {
    key: Option<Zeroizing<[u8; KEY_LEN]>>,
}

impl SecretBoxProvider {
    pub fn new(passphrase: &str) -> Self {
        if passphrase.is_empty() {
            return Self { key: None };
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        let bytes = passphrase.as_bytes();
        let n = bytes.len().min(KEY_LEN);
        key[..n].copy_from_slice(&bytes[..n]);
        Self { key: Some(key) }
    }

    fn cipher(&self) -> Result<XSalsa20Poly1305, SecretBoxError> {
        let key = self.key.as_ref().ok_or(SecretBoxError::NoKey)?;
        Ok(XSalsa20Poly1305::new(Key::from_slice(key.as_slice())))
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String, SecretBoxError> {
        let cipher = self.cipher()?;
        let nonce = XSalsa20Poly1305::generate_nonce(&mut OsRng);
        let sealed = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| SecretBoxError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(STANDARD.encode(out))
    }

    fn open(&self, ciphertext: &str) -> Result<Vec<u8>, SecretBoxError> {
        let cipher = self.cipher()?;
        let raw = STANDARD.decode(ciphertext.trim())?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(SecretBoxError::TooShort(raw.len()));
        }
        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| SecretBoxError::Authentication)
    }
}

impl EncryptionProvider for SecretBoxProvider {
    fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<String, BoxError> {
        Ok(self.seal(plaintext)?)
    }

    fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>, BoxError> {
        Ok(self.open(ciphertext)?)
    }
}

impl fmt::Debug for SecretBoxProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBoxProvider")
            .field("enabled", &self.key.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open() {
        let provider = SecretBoxProvider::new("correct horse");
        let ciphertext = provider.encrypt(br#"{"_type":"lwt","tst":1}"#).unwrap();
        let plaintext = provider.decrypt(&ciphertext).unwrap();
        assert_eq!(plaintext, br#"{"_type":"lwt","tst":1}"#);
    }

    #[test]
    fn nonces_differ_per_call() {
        let provider = SecretBoxProvider::new("k");
        let a = provider.encrypt(b"same").unwrap();
        let b = provider.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let sender = SecretBoxProvider::new("alpha");
        let receiver = SecretBoxProvider::new("bravo");
        let ciphertext = sender.encrypt(b"payload").unwrap();
        let err = receiver.open(&ciphertext).unwrap_err();
        assert!(matches!(err, SecretBoxError::Authentication));
    }

    #[test]
    fn long_passphrase_is_truncated() {
        let a = SecretBoxProvider::new(&"x".repeat(40));
        let b = SecretBoxProvider::new(&"x".repeat(32));
        let ciphertext = a.encrypt(b"payload").unwrap();
        assert_eq!(b.decrypt(&ciphertext).unwrap(), b"payload");
    }

    #[test]
    fn rejects_short_and_garbled_input() {
        let provider = SecretBoxProvider::new("k");
        assert!(matches!(
            provider.open(&STANDARD.encode([0u8; 10])),
            Err(SecretBoxError::TooShort(10))
        ));
        assert!(matches!(provider.open("not base64!"), Err(SecretBoxError::Base64(_))));
    }

    #[test]
    fn empty_passphrase_is_disabled() {
        let provider = SecretBoxProvider::new("");
        assert!(!provider.is_enabled());
        assert!(provider.encrypt(b"x").is_err());
    }

    #[test]
    fn debug_hides_key() {
        let provider = SecretBoxProvider::new("hunter2");
        assert_eq!(format!("{:?}", provider), "SecretBoxProvider { enabled: true }");
    }
}
