//! Fixed-width signature codec.
//!
//! A signature is the ordered pair (r, s), each coordinate an unsigned
//! big-endian integer left-zero-padded to the curve field size. The wire
//! form is always exactly 64 bytes (128 hex characters), which keeps the
//! encoding interoperable with browser-produced signatures.

use std::fmt;

use crate::error::CryptoError;

/// Byte length of one curve coordinate.
pub const FIELD_SIZE: usize = 32;

/// Byte length of an encoded signature pair.
pub const SIGNATURE_SIZE: usize = 2 * FIELD_SIZE;

/// A fixed-width encoded (r, s) signature pair.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignatureBytes(pub [u8; SIGNATURE_SIZE]);

impl SignatureBytes {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse from a byte slice. Length mismatches are hard errors.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SIGNATURE_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::WrongLength {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Decode a hex signature, e.g. one produced by a browser signer.
    ///
    /// Anything other than 128 characters fails with
    /// [`CryptoError::WrongLength`]; input of the right length that is not
    /// hex fails with [`CryptoError::Validation`]. No lenient parsing.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        if s.len() != 2 * SIGNATURE_SIZE {
            return Err(CryptoError::WrongLength {
                expected: SIGNATURE_SIZE,
                actual: s.len() / 2,
            });
        }
        let bytes = hex::decode(s).map_err(|e| CryptoError::Validation {
            field: "signature",
            reason: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Assemble from raw (r, s) coordinates, left-zero-padding each to the
    /// field size.
    ///
    /// A coordinate wider than the field is an error state, never
    /// truncated.
    pub fn from_coordinates(r: &[u8], s: &[u8]) -> Result<Self, CryptoError> {
        let mut out = [0u8; SIGNATURE_SIZE];
        fill_left(r, &mut out[..FIELD_SIZE])?;
        fill_left(s, &mut out[FIELD_SIZE..])?;
        Ok(Self(out))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// The r coordinate, left-zero-padded.
    pub fn r(&self) -> &[u8] {
        &self.0[..FIELD_SIZE]
    }

    /// The s coordinate, left-zero-padded.
    pub fn s(&self) -> &[u8] {
        &self.0[FIELD_SIZE..]
    }

    /// Convert to the 128-character hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_SIZE]> for SignatureBytes {
    fn from(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Copy `src` into the tail of `dst`, zero-filling the front.
fn fill_left(src: &[u8], dst: &mut [u8]) -> Result<(), CryptoError> {
    if src.len() > dst.len() {
        return Err(CryptoError::CoordinateOverflow {
            width: src.len(),
            field_size: dst.len(),
        });
    }
    let start = dst.len() - src.len();
    dst[start..].copy_from_slice(src);
    Ok(())
}
