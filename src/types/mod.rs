//! Core types for the codec.
//!
//! This module provides foundational types used throughout the crate:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for codec limits, encryption and logging

mod config;
mod errors;

pub use config::{
    CodecConfig, Config, EncryptionConfig, ObservabilityConfig, ENV_ENCRYPTION_KEY,
    ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MAX_INPUT_BYTES,
};
pub use errors::{BoxError, Error, Result};
