//! The digest collaborator consumed by the signature provider.
//!
//! The hash function is supplied by the embedding node, not implemented
//! here. The provider only requires a fixed 32-byte digest.

use thiserror::Error;

/// Byte length of a digest.
pub const DIGEST_SIZE: usize = 32;

/// Failure reported by the digest provider.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HashError(pub String);

/// Produces a fixed-length digest from an arbitrary byte payload.
pub trait Hasher: Send + Sync {
    /// Compute the digest of `data`.
    fn digest(&self, data: &[u8]) -> Result<[u8; DIGEST_SIZE], HashError>;
}
