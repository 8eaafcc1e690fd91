//! In-memory implementation of the PermissionStore trait.
//!
//! Primarily for testing. Same semantics as SQLite, no persistence.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::record::{InstanceId, PermissionRecord};
use crate::traits::PermissionStore;

/// In-memory permission registry. Thread-safe via RwLock.
pub struct MemoryPermissionStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    provisioned: HashSet<InstanceId>,
    records: HashMap<(InstanceId, String), PermissionRecord>,
}

impl MemoryPermissionStore {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryPermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_provisioned(inner: &Inner, instance: InstanceId) -> Result<()> {
    if !inner.provisioned.contains(&instance) {
        return Err(StoreError::NotProvisioned(instance.as_u64()));
    }
    Ok(())
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn provision(&self, instance: InstanceId) -> Result<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.provisioned.insert(instance);
        Ok(())
    }

    async fn create(&self, instance: InstanceId, record: &PermissionRecord) -> Result<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        check_provisioned(&inner, instance)?;

        let key = (instance, record.name.clone());
        if inner.records.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                instance: instance.as_u64(),
                table: record.name.clone(),
            });
        }
        inner.records.insert(key, record.clone());
        Ok(())
    }

    async fn exists_by_name(&self, instance: InstanceId, table: &str) -> Result<bool> {
        let inner = self.inner.read().expect("lock poisoned");
        check_provisioned(&inner, instance)?;
        Ok(inner.records.contains_key(&(instance, table.to_string())))
    }

    async fn get_by_name(&self, instance: InstanceId, table: &str) -> Result<PermissionRecord> {
        let inner = self.inner.read().expect("lock poisoned");
        check_provisioned(&inner, instance)?;
        inner
            .records
            .get(&(instance, table.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                instance: instance.as_u64(),
                table: table.to_string(),
            })
    }

    async fn get_permissions(
        &self,
        instance: InstanceId,
        table: &str,
        action: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let record = self.get_by_name(instance, table).await?;
        match action {
            None => Ok(record.column_permissions),
            Some(key) => {
                let mut narrowed = BTreeMap::new();
                if let Some(condition) = record.column_permissions.get(key) {
                    narrowed.insert(key.to_string(), condition.clone());
                }
                Ok(narrowed)
            }
        }
    }

    async fn set_action(
        &self,
        instance: InstanceId,
        table: &str,
        action: &str,
        condition: &str,
        rollback_version: u64,
    ) -> Result<u64> {
        let mut inner = self.inner.write().expect("lock poisoned");
        check_provisioned(&inner, instance)?;

        let record = inner
            .records
            .get_mut(&(instance, table.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                instance: instance.as_u64(),
                table: table.to_string(),
            })?;

        if rollback_version < record.rollback_version {
            return Err(StoreError::StaleVersion {
                table: table.to_string(),
                stored: record.rollback_version,
                supplied: rollback_version,
            });
        }

        record
            .column_permissions
            .insert(action.to_string(), condition.to_string());
        record.rollback_version = rollback_version;
        Ok(1)
    }
}
