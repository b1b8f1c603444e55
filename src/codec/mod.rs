//! Message codec.
//!
//! Converts [`Message`] values to and from their JSON wire form and applies
//! payload encryption through an injected [`EncryptionProvider`].
//!
//! Decode accepts three wire shapes:
//! ```text
//! 1) [ {plain}, {plain}, ... ]
//! 2) {plain}                                  (one-element batch)
//! 3) {"_type":"encrypted","data":"..."}       (decrypts to shape 1 or 2)
//! ```
//! An envelope is only resolved when it is the whole payload. A batch that
//! carries an envelope among other messages is returned unresolved; callers
//! that accept such batches must check [`Message::is_encrypted`] themselves.

mod shape;

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::encryption::{EncryptionProvider, SecretBoxProvider};
use crate::messages::{EncryptedEnvelope, Message, MessageType, TYPE_FIELD};
use crate::types::{Config, Error, Result};

use shape::{sort_keys, WireShape};

/// Default cap on stream inputs (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 5 * 1024 * 1024;

/// Stateless JSON codec. Cheap to clone; safe to share across threads.
#[derive(Clone)]
pub struct Codec {
    provider: Option<Arc<dyn EncryptionProvider>>,
    max_input_bytes: u64,
}

impl Codec {
    pub fn new(provider: Arc<dyn EncryptionProvider>) -> Self {
        Self {
            provider: Some(provider),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Codec with no encryption provider at all.
    pub fn unencrypted() -> Self {
        Self {
            provider: None,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Build from configuration; a configured key installs a secretbox provider.
    pub fn from_config(config: &Config) -> Self {
        let codec = match config.encryption.key.as_deref() {
            Some(key) if !key.is_empty() => Codec::new(Arc::new(SecretBoxProvider::new(key))),
            _ => Codec::unencrypted(),
        };
        codec.with_max_input_bytes(config.codec.max_input_bytes)
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn max_input_bytes(&self) -> u64 {
        self.max_input_bytes
    }

    pub fn is_encryption_enabled(&self) -> bool {
        self.active_provider().is_some()
    }

    /// The provider, only if one is installed and currently enabled.
    fn active_provider(&self) -> Option<&dyn EncryptionProvider> {
        self.provider
            .as_deref()
            .filter(|provider| provider.is_enabled())
    }

    fn require_provider(&self) -> Result<&dyn EncryptionProvider> {
        self.active_provider().ok_or_else(|| {
            warn!("received encrypted message but payload encryption is not enabled");
            Error::EncryptionDisabled
        })
    }

    // =========================================================================
    // Encode
    // =========================================================================

    /// Compact JSON with keys in lexicographic order.
    pub fn encode_plain_text(&self, message: &Message) -> Result<String> {
        serde_json::to_string(&canonical_value(message)?).map_err(Error::encode)
    }

    /// Indented JSON with `\n` line endings.
    pub fn encode_plain_pretty(&self, message: &Message) -> Result<String> {
        let pretty =
            serde_json::to_string_pretty(&canonical_value(message)?).map_err(Error::encode)?;
        Ok(pretty.replace("\r\n", "\n"))
    }

    /// Indented JSON array of every message, `\n` line endings.
    pub fn encode_plain_pretty_batch(&self, messages: &[Message]) -> Result<String> {
        let values = messages
            .iter()
            .map(canonical_value)
            .collect::<Result<Vec<_>>>()?;
        let pretty = serde_json::to_string_pretty(&Value::Array(values)).map_err(Error::encode)?;
        Ok(pretty.replace("\r\n", "\n"))
    }

    pub fn encode_plain_bytes(&self, message: &Message) -> Result<Vec<u8>> {
        serde_json::to_vec(&canonical_value(message)?).map_err(Error::encode)
    }

    /// Wire form: plain JSON, or an encrypted envelope when encryption is enabled.
    pub fn encode(&self, message: &Message) -> Result<String> {
        let plain = self.encode_plain_text(message)?;
        match self.seal(message, plain.as_bytes())? {
            Some(envelope) => self.encode_plain_text(&envelope),
            None => Ok(plain),
        }
    }

    pub fn encode_bytes(&self, message: &Message) -> Result<Vec<u8>> {
        let plain = self.encode_plain_bytes(message)?;
        match self.seal(message, &plain)? {
            Some(envelope) => self.encode_plain_bytes(&envelope),
            None => Ok(plain),
        }
    }

    /// Encrypt a whole batch into one envelope.
    pub fn encrypt_batch(&self, messages: &[Message]) -> Result<String> {
        if messages.iter().any(Message::is_encrypted) {
            return Err(Error::encode("batch already contains an encrypted envelope"));
        }
        let provider = self.active_provider().ok_or(Error::EncryptionDisabled)?;
        let values = messages
            .iter()
            .map(canonical_value)
            .collect::<Result<Vec<_>>>()?;
        let plain = serde_json::to_vec(&Value::Array(values)).map_err(Error::encode)?;

        debug!(count = messages.len(), "sealing batch in encrypted envelope");
        let data = provider.encrypt(&plain).map_err(Error::Encode)?;
        self.encode_plain_text(&Message::Encrypted(EncryptedEnvelope::new(data)))
    }

    /// Envelope for `plaintext`, or `None` when the plain form goes out as-is.
    fn seal(&self, message: &Message, plaintext: &[u8]) -> Result<Option<Message>> {
        let Some(provider) = self.active_provider() else {
            return Ok(None);
        };
        if message.is_encrypted() {
            debug!("message is already an encrypted envelope, not wrapping again");
            return Ok(None);
        }
        debug!(message_type = %message.message_type(), "sealing message in encrypted envelope");
        let data = provider.encrypt(plaintext).map_err(Error::Encode)?;
        Ok(Some(Message::Encrypted(EncryptedEnvelope::new(data))))
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Decode exactly one message, resolving an encrypted envelope.
    pub fn decode_single(&self, input: impl AsRef<[u8]>) -> Result<Message> {
        match WireShape::parse(input.as_ref())?.into_single()? {
            Message::Encrypted(envelope) => self.resolve_single(&envelope),
            message => Ok(message),
        }
    }

    /// Decode exactly one message without touching envelopes.
    pub fn decode_unencrypted(&self, input: impl AsRef<[u8]>) -> Result<Message> {
        WireShape::parse(input.as_ref())?.into_single()
    }

    /// Decode any accepted wire shape into a batch.
    pub fn decode_sequence(&self, input: impl AsRef<[u8]>) -> Result<Vec<Message>> {
        let shape = WireShape::parse(input.as_ref())?;
        let kind = shape.kind();
        let raw = shape.into_sequence()?;
        debug!(shape = kind, count = raw.len(), "decoded raw sequence");

        if let [Message::Encrypted(envelope)] = raw.as_slice() {
            return self.resolve_batch(envelope);
        }
        if raw.iter().any(Message::is_encrypted) {
            warn!(
                count = raw.len(),
                "batch carries an encrypted envelope among other messages; returning it unresolved"
            );
        }
        Ok(raw)
    }

    /// Read a stream to completion, failing once it passes the input cap.
    pub fn read_input<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        reader
            .take(self.max_input_bytes.saturating_add(1))
            .read_to_end(&mut buf)?;
        self.check_input_len(buf.len())?;
        Ok(buf)
    }

    /// Async variant of [`Codec::read_input`].
    pub async fn read_input_async<R: AsyncRead + Unpin>(&self, reader: R) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        reader
            .take(self.max_input_bytes.saturating_add(1))
            .read_to_end(&mut buf)
            .await?;
        self.check_input_len(buf.len())?;
        Ok(buf)
    }

    /// Read a stream to completion, then decode it as a batch.
    pub fn decode_sequence_reader<R: Read>(&self, reader: R) -> Result<Vec<Message>> {
        let buf = self.read_input(reader)?;
        self.decode_sequence(&buf)
    }

    /// Async variant of [`Codec::decode_sequence_reader`].
    pub async fn decode_sequence_async<R: AsyncRead + Unpin>(
        &self,
        reader: R,
    ) -> Result<Vec<Message>> {
        let buf = self.read_input_async(reader).await?;
        self.decode_sequence(&buf)
    }

    fn check_input_len(&self, len: usize) -> Result<()> {
        if len as u64 > self.max_input_bytes {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Input too large: more than {} bytes", self.max_input_bytes),
            )));
        }
        Ok(())
    }

    /// Decrypt an envelope into the batch it carries.
    fn resolve_batch(&self, envelope: &EncryptedEnvelope) -> Result<Vec<Message>> {
        let provider = self.require_provider()?;
        let plaintext = provider.decrypt(&envelope.data).map_err(Error::Capability)?;
        let messages = WireShape::parse(&plaintext)?.into_sequence()?;
        if messages.iter().any(Message::is_encrypted) {
            return Err(Error::protocol("nested encrypted envelope"));
        }
        debug!(count = messages.len(), "resolved encrypted envelope");
        Ok(messages)
    }

    fn resolve_single(&self, envelope: &EncryptedEnvelope) -> Result<Message> {
        let mut messages = self.resolve_batch(envelope)?;
        if messages.len() != 1 {
            return Err(Error::protocol(format!(
                "encrypted envelope resolved to {} messages, expected exactly one",
                messages.len()
            )));
        }
        Ok(messages.remove(0))
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::unencrypted()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("has_provider", &self.provider.is_some())
            .field("encryption_enabled", &self.is_encryption_enabled())
            .field("max_input_bytes", &self.max_input_bytes)
            .finish()
    }
}

fn canonical_value(message: &Message) -> Result<Value> {
    validate(message)?;
    serde_json::to_value(message)
        .map(sort_keys)
        .map_err(Error::encode)
}

/// Reject values JSON cannot carry and fields that would forge the tag.
fn validate(message: &Message) -> Result<()> {
    let coords = match message {
        Message::Location(m) => Some((m.lat, m.lon)),
        Message::Transition(m) => Some((m.lat, m.lon)),
        Message::Waypoint(m) => Some((m.lat, m.lon)),
        _ => None,
    };
    if let Some((lat, lon)) = coords {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(Error::encode(format!(
                "{} coordinates must be finite",
                message.message_type()
            )));
        }
    }

    match message {
        Message::Configuration(config) if config.settings.contains_key(TYPE_FIELD) => Err(
            Error::encode(format!("configuration settings must not contain {:?}", TYPE_FIELD)),
        ),
        Message::Unknown(unknown) => {
            if unknown.message_type.is_empty()
                || MessageType::from_tag(&unknown.message_type).is_some()
            {
                return Err(Error::encode(format!(
                    "{:?} is not a valid tag for an unknown message",
                    unknown.message_type
                )));
            }
            if unknown.fields.contains_key(TYPE_FIELD) {
                return Err(Error::encode(format!(
                    "unknown message fields must not contain {:?}",
                    TYPE_FIELD
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
