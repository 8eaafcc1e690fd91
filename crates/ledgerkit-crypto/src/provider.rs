//! The pluggable signature provider.
//!
//! Signing and verification are strategy-selected by a scheme identifier
//! chosen at construction time, so new algorithms can be added without
//! touching call sites and two differently-configured providers can
//! coexist in one process.

use std::fmt;
use std::sync::Arc;

use p256::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use p256::ecdsa::Signature as P256Signature;
use rand::rngs::OsRng;
use tracing::debug;

use crate::codec::{SignatureBytes, FIELD_SIZE, SIGNATURE_SIZE};
use crate::error::{ConfigError, CryptoError, Result};
use crate::hasher::Hasher;
use crate::keys::{PrivateKey, PublicKey};

/// Identifier for a signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// ECDSA over NIST P-256 with a random nonce.
    EcdsaP256,
}

impl SignatureScheme {
    /// Resolve a scheme from its configured name.
    ///
    /// Unknown names are a startup-time [`ConfigError`], never a per-call
    /// failure.
    pub fn from_name(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "ecdsa-p256" => Ok(Self::EcdsaP256),
            other => Err(ConfigError::UnknownScheme(other.to_string())),
        }
    }

    /// The configured name of this scheme.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EcdsaP256 => "ecdsa-p256",
        }
    }

    /// Byte length of one curve coordinate.
    pub fn field_size(&self) -> usize {
        match self {
            Self::EcdsaP256 => FIELD_SIZE,
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signs and verifies transaction payloads over the configured curve.
///
/// Operations are pure functions of their inputs; a provider can be shared
/// freely across validating workers.
#[derive(Clone)]
pub struct SignatureProvider {
    scheme: SignatureScheme,
    hasher: Arc<dyn Hasher>,
}

impl SignatureProvider {
    /// Create a provider for an already-resolved scheme.
    pub fn new(scheme: SignatureScheme, hasher: Arc<dyn Hasher>) -> Self {
        Self { scheme, hasher }
    }

    /// Create a provider from a configured scheme name.
    pub fn from_name(
        name: &str,
        hasher: Arc<dyn Hasher>,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(SignatureScheme::from_name(name)?, hasher))
    }

    /// The configured scheme.
    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Sign `message` with `key`.
    ///
    /// The message is digested through the configured [`Hasher`] and the
    /// digest signed with a cryptographically secure random nonce. The
    /// result is the fixed-width (r, s) encoding.
    pub fn sign(&self, key: &PrivateKey, message: &[u8]) -> Result<SignatureBytes> {
        if message.is_empty() {
            debug!("signing an empty payload");
        }
        match self.scheme {
            SignatureScheme::EcdsaP256 => self.sign_ecdsa(key, message),
        }
    }

    /// Verify `signature` over `message` for the signer `public`.
    ///
    /// Inputs arrive as wire bytes. Malformed input (empty message, empty
    /// signature, public key of the wrong width) fails with
    /// [`CryptoError::Validation`]; a well-formed signature that fails the
    /// curve predicate fails with [`CryptoError::VerificationFailed`], so
    /// callers can tell a bad request from suspected tampering.
    pub fn verify(&self, public: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
        if message.is_empty() {
            return Err(CryptoError::Validation {
                field: "message",
                reason: "empty".to_string(),
            });
        }
        if signature.is_empty() {
            return Err(CryptoError::Validation {
                field: "signature",
                reason: "empty".to_string(),
            });
        }
        let public = PublicKey::from_slice(public)?;
        let signature = SignatureBytes::from_slice(signature)?;
        match self.scheme {
            SignatureScheme::EcdsaP256 => self.verify_ecdsa(&public, message, &signature),
        }
    }

    /// Decode a hex signature into its fixed-width byte form.
    ///
    /// Accepts externally (e.g. browser-) produced signatures; anything
    /// other than 128 hex characters is a [`CryptoError::WrongLength`],
    /// non-hex content a [`CryptoError::Validation`].
    pub fn decode_hex(&self, signature: &str) -> Result<SignatureBytes> {
        SignatureBytes::from_hex(signature)
    }

    fn sign_ecdsa(&self, key: &PrivateKey, message: &[u8]) -> Result<SignatureBytes> {
        let digest = self.hasher.digest(message)?;
        let sig: P256Signature = key
            .signing_key()
            .sign_prehash_with_rng(&mut OsRng, &digest)
            .map_err(|_| CryptoError::Validation {
                field: "private key",
                reason: "signing failed".to_string(),
            })?;
        // to_bytes() is already the left-zero-padded r‖s encoding.
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes.copy_from_slice(&sig.to_bytes());
        Ok(SignatureBytes::from_bytes(bytes))
    }

    fn verify_ecdsa(
        &self,
        public: &PublicKey,
        message: &[u8],
        signature: &SignatureBytes,
    ) -> Result<()> {
        let verifying_key = public.to_verifying_key()?;
        // An (r, s) pair outside the scalar field can never verify; report
        // it the same way as any other failed predicate.
        let sig = P256Signature::from_slice(signature.as_bytes())
            .map_err(|_| CryptoError::VerificationFailed)?;
        let digest = self.hasher.digest(message)?;
        verifying_key
            .verify_prehash(&digest, &sig)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for SignatureProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureProvider({})", self.scheme)
    }
}
