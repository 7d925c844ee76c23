//! Errors produced while constructing, signing and encoding a CACAO.

use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacaoError {
    /// The account is not a `0x`-prefixed, 20 byte hex address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The audience, login URI or a resource is not an absolute URI
    #[error("Invalid URI {uri}: {reason}")]
    InvalidUri {
        /// The rejected input
        uri: String,
        /// Why the URI parser rejected it
        reason: String,
    },

    /// Seconds outside of the range a UTC calendar date can express
    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    /// The validity window does not satisfy `nbf <= iat < exp`
    #[error("Invalid validity window: nbf={not_before}, iat={issued_at}, exp={expiration}")]
    InvalidValidityWindow {
        /// Not-before seconds
        not_before: i64,
        /// Issued-at seconds
        issued_at: i64,
        /// Expiration seconds
        expiration: i64,
    },

    /// A field rendered into the message contains a line break
    #[error("Field {field} must be a single line, got {value:?}")]
    MultilineField {
        /// Name of the offending field
        field: &'static str,
        /// The rejected input
        value: String,
    },

    /// The header tag or payload version is not the one this crate signs
    #[error("Unsupported {field}: {value}")]
    UnsupportedFormat {
        /// `t` or `version`
        field: &'static str,
        /// The value found
        value: String,
    },

    /// A required builder field was never set
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The signature is not an even-length hex string
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// The object holds a value DAG-CBOR cannot represent
    #[error("Failed to encode a block: {0}")]
    EncodingFailure(String),

    /// The bytes do not hash to the CID they were paired with
    #[error("CID mismatch: expected {expected}, computed {actual}")]
    CidMismatch {
        /// CID the bytes were claimed to have
        expected: String,
        /// CID computed from the bytes
        actual: String,
    },

    /// The bytes are not a valid DAG-CBOR encoding of the requested type
    #[error("Failed to decode a block: {0}")]
    DecodingFailure(String),
}
