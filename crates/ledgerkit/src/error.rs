//! Error types for the access gate.

use ledgerkit_crypto::CryptoError;
use ledgerkit_perms::StoreError;
use thiserror::Error;

/// Failure reported by the external condition evaluator.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EvalError(pub String);

/// Errors that can occur while authorizing a transaction.
///
/// Every failure surfaces; the gate never converts one into a silent
/// deny.
#[derive(Debug, Error)]
pub enum GateError {
    /// Signature validation or verification failure.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Permission registry failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The condition evaluator failed.
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvalError),
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
