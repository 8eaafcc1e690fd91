//! Error types for ledgerkit-crypto.

use thiserror::Error;

use crate::hasher::HashError;

/// Startup-time configuration errors.
///
/// A separate type from [`CryptoError`] on purpose: configuration problems
/// must abort provider construction, never surface per call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown signature scheme: {0}")]
    UnknownScheme(String),

    #[error("unsupported curve field size: {0} bytes")]
    UnsupportedFieldSize(usize),
}

/// Errors from signing, verification, and signature decoding.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input was malformed before any cryptography ran. Recoverable;
    /// reported to the caller.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// Signature material had the wrong width.
    #[error("wrong signature length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A computed coordinate is wider than the curve field. Hard error,
    /// never silently truncated.
    #[error("coordinate overflows field size: {width} bytes > {field_size}")]
    CoordinateOverflow { width: usize, field_size: usize },

    /// Inputs were well-formed but the curve predicate failed. Reported
    /// distinctly from [`CryptoError::Validation`] so callers can treat it
    /// as suspected tampering.
    #[error("signature verification failed")]
    VerificationFailed,

    /// The digest collaborator failed.
    #[error("hashing failed: {0}")]
    Hashing(#[from] HashError),
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
