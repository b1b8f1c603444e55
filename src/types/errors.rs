//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The codec
//! keeps four failure classes apart: malformed input, shape violations,
//! ciphertext with no active provider, and provider failures.

use thiserror::Error;

/// Boxed error raised by an encryption provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the codec.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed JSON or a value that does not match any message schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed JSON that violates the wire shape contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An encrypted envelope arrived but payload encryption is not enabled.
    #[error("received encrypted message but payload encryption is not enabled")]
    EncryptionDisabled,

    /// The encryption provider failed (bad key, authentication, corrupt data).
    #[error("encryption provider error: {0}")]
    Capability(#[source] BoxError),

    /// Encoding failed, either in serialization or in the provider.
    #[error("encode error: {0}")]
    Encode(#[source] BoxError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O errors while reading an input stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn encode(err: impl Into<BoxError>) -> Self {
        Self::Encode(err.into())
    }
}

impl Error {
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }

    pub fn is_encryption_disabled(&self) -> bool {
        matches!(self, Error::EncryptionDisabled)
    }

    pub fn is_capability(&self) -> bool {
        matches!(self, Error::Capability(_))
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_))
    }
}
