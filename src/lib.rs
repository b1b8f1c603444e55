//! # Waypoint Codec - JSON messages with payload encryption
//!
//! Converts location-sharing messages to and from their JSON wire form:
//! - Canonical encoding with lexicographically ordered keys
//! - Optional payload encryption into an `{"_type":"encrypted"}` envelope
//! - Decoding of a single object, an array, or an envelope wrapping a batch
//! - Distinct errors for parse failures, shape violations, disabled
//!   encryption and provider failures
//!
//! ## Architecture
//!
//! ```text
//!   encode:  Message ──► canonical JSON ──► [provider.encrypt] ──► envelope JSON
//!   decode:  bytes ──► root shape ──► tag dispatch ──► [provider.decrypt] ──► Vec<Message>
//! ```
//!
//! Bracketed steps run only when an [`EncryptionProvider`] is installed and enabled.
//!
//! The [`Codec`] holds no state beyond its provider and is safe to share.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod codec;
pub mod encryption;
pub mod messages;
pub mod types;

// Internal utilities
pub mod observability;

pub use codec::Codec;
pub use encryption::{DisabledProvider, EncryptionProvider, SecretBoxProvider};
pub use messages::{EncryptedEnvelope, Message, MessageType, UnknownMessage};
pub use types::{Config, Error, Result};
