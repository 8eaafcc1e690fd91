//! # ledgerkit
//!
//! The unified API for transaction authentication and column-level access
//! governance in a permissioned, multi-tenant ledger.
//!
//! ## Overview
//!
//! A client hashes a transaction payload, signs the digest, and submits
//! the transaction. A validating node runs it through an [`AccessGate`]:
//! the signature is re-verified, and when the transaction touches a
//! governed table, the stored condition expression is fetched and the
//! accept/reject decision delegated to an external
//! [`ConditionEvaluator`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ledgerkit::{AccessGate, GateConfig};
//! use ledgerkit::perms::SqlitePermissionStore;
//!
//! # fn example(hasher: Arc<dyn ledgerkit::crypto::Hasher>,
//! #            evaluator: Arc<dyn ledgerkit::ConditionEvaluator>) {
//! let store = Arc::new(SqlitePermissionStore::open("perms.db").unwrap());
//! let gate = AccessGate::new(&GateConfig::default(), hasher, store, evaluator).unwrap();
//! # }
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerkit::crypto` - signature provider, codec, key types
//! - `ledgerkit::perms` - permission registry and backends

pub mod error;
pub mod gate;

// Re-export component crates
pub use ledgerkit_crypto as crypto;
pub use ledgerkit_perms as perms;

// Re-export main types for convenience
pub use error::{EvalError, GateError, Result};
pub use gate::{
    AccessGate, ConditionEvaluator, Decision, EvalContext, GateConfig, SignedTransaction,
    TableScope,
};

// Re-export commonly used component types
pub use ledgerkit_crypto::{
    PrivateKey, PublicKey, SignatureBytes, SignatureProvider, SignatureScheme,
};
pub use ledgerkit_perms::{InstanceId, PermissionRecord, PermissionStore};
