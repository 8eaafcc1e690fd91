//! # ledgerkit-crypto
//!
//! Transaction authentication primitives for a permissioned ledger:
//! a strategy-selected signature provider and the fixed-width signature
//! codec it shares with external transcoding call sites.
//!
//! This crate contains no I/O and no storage. The digest function is an
//! external collaborator behind the [`Hasher`] trait.
//!
//! ## Key Types
//!
//! - [`SignatureProvider`] - scheme-selected signing and verification
//! - [`SignatureBytes`] - canonical 64-byte (r, s) encoding
//! - [`PrivateKey`] / [`PublicKey`] - externally supplied key material
//!
//! ## Encoding
//!
//! A signature is r‖s with each coordinate left-zero-padded to the
//! 32-byte field size; the equivalent hex form is 128 characters and is
//! accepted from browser-signed input. Length mismatches are hard errors.

pub mod codec;
pub mod error;
pub mod hasher;
pub mod keys;
pub mod provider;

pub use codec::{SignatureBytes, FIELD_SIZE, SIGNATURE_SIZE};
pub use error::{ConfigError, CryptoError, Result};
pub use hasher::{HashError, Hasher, DIGEST_SIZE};
pub use keys::{PrivateKey, PublicKey, PUBLIC_KEY_SIZE};
pub use provider::{SignatureProvider, SignatureScheme};
