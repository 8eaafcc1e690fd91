//! PermissionStore trait: the abstract interface for governance records.
//!
//! The registry is backed by a shared persistent store with no in-process
//! cache: every access-control check re-reads the store so concurrent
//! validators always see current authorization data.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{InstanceId, PermissionRecord};

/// The async interface for the per-instance permission registry.
///
/// # Design Notes
///
/// - **Idempotent provisioning**: `provision` on an existing namespace is
///   a no-op, never an error.
/// - **Single-record keying**: exactly one record per (instance, table).
/// - **Serialized mutation**: racing `set_action` calls on the same key
///   cannot interleave; one update never silently drops the other's
///   effect on sibling actions.
/// - **Monotonic versions**: a supplied rollback version lower than the
///   stored one is rejected with `StaleVersion`; the visible version
///   never decreases.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Create the permission namespace for a ledger instance if absent.
    ///
    /// Idempotent: re-invoking for a provisioned instance succeeds without
    /// side effects.
    async fn provision(&self, instance: InstanceId) -> Result<()>;

    /// Declare a governed table.
    ///
    /// Fails with `AlreadyExists` if the table is already governed and
    /// `NotProvisioned` if the namespace is missing.
    async fn create(&self, instance: InstanceId, record: &PermissionRecord) -> Result<()>;

    /// Check whether a governance record exists for `table`.
    async fn exists_by_name(&self, instance: InstanceId, table: &str) -> Result<bool>;

    /// Fetch the governance record for `table`.
    ///
    /// Fails with `NotFound` if absent.
    async fn get_by_name(&self, instance: InstanceId, table: &str) -> Result<PermissionRecord>;

    /// Fetch the column/action condition mapping for `table`.
    ///
    /// With `action` supplied, the mapping is narrowed to that one key
    /// (empty when the key is absent).
    async fn get_permissions(
        &self,
        instance: InstanceId,
        table: &str,
        action: Option<&str>,
    ) -> Result<BTreeMap<String, String>>;

    /// Overwrite exactly one action's condition and persist the supplied
    /// rollback version atomically with it.
    ///
    /// Sibling entries are untouched; no partial write is observable.
    /// Returns the number of rows affected.
    async fn set_action(
        &self,
        instance: InstanceId,
        table: &str,
        action: &str,
        condition: &str,
        rollback_version: u64,
    ) -> Result<u64>;
}
