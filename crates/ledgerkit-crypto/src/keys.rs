//! Key material for transaction signing.
//!
//! Keys are supplied externally and never generated here. The private key
//! is a fixed-length hex scalar; the public key is the untagged X‖Y curve
//! point, each coordinate exactly one field size wide.

use std::fmt;

use p256::ecdsa::{SigningKey, VerifyingKey};

use crate::codec::FIELD_SIZE;
use crate::error::CryptoError;

/// Byte length of an encoded public key (X‖Y).
pub const PUBLIC_KEY_SIZE: usize = 2 * FIELD_SIZE;

/// A P-256 private scalar.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Parse from a fixed-length hex scalar (64 characters).
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::Validation {
            field: "private key",
            reason: e.to_string(),
        })?;
        let arr: [u8; FIELD_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::Validation {
                    field: "private key",
                    reason: format!("expected {} bytes, got {}", FIELD_SIZE, bytes.len()),
                })?;
        Self::from_bytes(&arr)
    }

    /// Create from a raw 32-byte scalar.
    pub fn from_bytes(bytes: &[u8; FIELD_SIZE]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::Validation {
                field: "private key",
                reason: "not a valid curve scalar".to_string(),
            })?;
        Ok(Self { signing_key })
    }

    /// The corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        // Untagged encoding: drop the 0x04 SEC1 tag.
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        PublicKey(bytes)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?})", self.public_key())
    }
}

/// A P-256 public key, encoded as X‖Y big-endian bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Parse from a byte slice; the length must be exactly 64.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::Validation {
                field: "public key",
                reason: format!("expected {} bytes, got {}", PUBLIC_KEY_SIZE, bytes.len()),
            })?;
        Ok(Self(arr))
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::Validation {
            field: "public key",
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Reconstruct the curve point behind this encoding.
    pub(crate) fn to_verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        let mut sec1 = [0u8; 1 + PUBLIC_KEY_SIZE];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(&self.0);
        VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| CryptoError::Validation {
            field: "public key",
            reason: "not a point on the curve".to_string(),
        })
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SCALAR: &str =
        "2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a";

    #[test]
    fn test_private_key_from_hex() {
        let key = PrivateKey::from_hex(TEST_SCALAR).unwrap();
        assert_eq!(key.public_key().as_bytes().len(), PUBLIC_KEY_SIZE);
    }

    #[test]
    fn test_private_key_deterministic() {
        let k1 = PrivateKey::from_hex(TEST_SCALAR).unwrap();
        let k2 = PrivateKey::from_hex(TEST_SCALAR).unwrap();
        assert_eq!(k1.public_key(), k2.public_key());
    }

    #[test]
    fn test_private_key_rejects_short_hex() {
        let err = PrivateKey::from_hex("2a2a").unwrap_err();
        assert!(matches!(err, CryptoError::Validation { field: "private key", .. }));
    }

    #[test]
    fn test_private_key_rejects_zero_scalar() {
        let err = PrivateKey::from_bytes(&[0u8; FIELD_SIZE]).unwrap_err();
        assert!(matches!(err, CryptoError::Validation { .. }));
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let key = PrivateKey::from_hex(TEST_SCALAR).unwrap();
        let pk = key.public_key();
        let recovered = PublicKey::from_hex(&pk.to_hex()).unwrap();
        assert_eq!(pk, recovered);
    }

    #[test]
    fn test_public_key_rejects_wrong_length() {
        let err = PublicKey::from_slice(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, CryptoError::Validation { field: "public key", .. }));
    }

    #[test]
    fn test_public_key_point_roundtrip() {
        let key = PrivateKey::from_hex(TEST_SCALAR).unwrap();
        let pk = key.public_key();
        // The untagged encoding must decode back to a valid curve point.
        pk.to_verifying_key().unwrap();
    }
}
