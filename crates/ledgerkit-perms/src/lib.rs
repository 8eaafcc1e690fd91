//! # ledgerkit-perms
//!
//! Per-ledger-instance permission registry: stores, retrieves, and
//! atomically updates the column/action condition expressions governing
//! table access.
//!
//! ## Overview
//!
//! Governance records live behind the [`PermissionStore`] trait, with
//! [`SqlitePermissionStore`] as the primary backend and
//! [`MemoryPermissionStore`] for tests. Each ledger instance gets its own
//! provisioned namespace; records are keyed by table name and carry a
//! monotonic rollback version.
//!
//! The condition expressions themselves are opaque strings here; an
//! external execution engine interprets them at transaction-apply time.
//!
//! ## Design Notes
//!
//! - **No cache**: every access-control check re-reads the store, so
//!   concurrent validators always decide on current data.
//! - **Idempotent provisioning**: `provision` on an existing namespace is
//!   a no-op.
//! - **Serialized updates**: `set_action` runs in a transaction and
//!   rejects rollback versions behind the stored one, so racing
//!   governance updates cannot silently drop each other's effect.

pub mod error;
pub mod memory;
pub mod record;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryPermissionStore;
pub use record::{InstanceId, LogicalKind, PermissionRecord};
pub use sqlite::SqlitePermissionStore;
pub use traits::PermissionStore;
