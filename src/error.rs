//! # Error Types
//!
//! Comprehensive error handling for the client protocol layer.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from codec failures on individual wire fields to login
//! handshake transport errors.
//!
//! ## Error Categories
//! - **Codec Errors**: Oversized fields, truncated buffers, unknown message kinds
//! - **Handshake Errors**: Transport failures and protocol misuse during login
//! - **I/O Errors**: Network and file system failures
//! - **Configuration Errors**: Invalid or unreadable configuration
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Session-state lock errors
    pub const ERR_SESSION_WRITE_LOCK: &str = "Failed to acquire write lock on session state";
    pub const ERR_SESSION_READ_LOCK: &str = "Failed to acquire read lock on session state";

    /// Handshake errors
    pub const ERR_ALREADY_AUTHENTICATED: &str =
        "Login submitted while a session is already established";
    pub const ERR_EMPTY_ENDPOINT: &str = "No server address configured";

    /// Transport errors
    pub const ERR_TLS_UNSUPPORTED: &str =
        "Encrypted scheme requested but this transport only speaks plain HTTP";
    pub const ERR_MALFORMED_RESPONSE: &str = "Malformed HTTP response from login server";
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed before a full response arrived";
}

/// Primary error type for all protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A text field's value does not fit its declared wire capacity.
    /// Encoding never truncates; the caller must shorten the value.
    #[error("field `{field}` is {len} bytes but its wire capacity is {capacity}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        capacity: usize,
    },

    /// The header's kind tag does not map to any registered layout.
    #[error("unknown message kind: {0}")]
    UnknownKind(i32),

    /// Fewer bytes were supplied than the kind's fixed layout requires.
    #[error("truncated input: layout requires {needed} bytes, got {got}")]
    TruncatedInput { needed: usize, got: usize },

    /// A fixed text field held bytes that cannot be read as expected.
    /// Decoding recovers by substituting an empty string; this variant
    /// exists for callers that promote a reported warning to a hard error.
    #[error("malformed field `{field}`: {reason}")]
    MalformedField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("handshake error: {0}")]
    HandshakeError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
