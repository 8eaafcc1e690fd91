//! SQLite implementation of the PermissionStore trait.
//!
//! The primary backend. Uses rusqlite with bundled SQLite behind a mutex,
//! wrapped in async via tokio::spawn_blocking. Mutations run inside a
//! transaction on the single shared connection, which serializes racing
//! governance updates on the same record. A caller that drops the
//! awaiting future raises an abandonment flag; the queued closure
//! observes it before commit and rolls back instead of finishing a write
//! nobody waits for.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::record::{InstanceId, LogicalKind, PermissionRecord};
use crate::schema;
use crate::traits::PermissionStore;

/// SQLite-based permission registry.
pub struct SqlitePermissionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePermissionStore {
    /// Open a registry database at the given path, running migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory registry. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` on the blocking pool with exclusive connection access.
    ///
    /// The closure receives an abandonment flag that turns true when the
    /// returned future is dropped before completion; mutations check it
    /// before committing.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection, &AtomicBool) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let abandoned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&abandoned);
        let _guard = AbandonGuard(abandoned);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::Internal("connection mutex poisoned".to_string()))?;
            f(&mut conn, &flag)
        })
        .await
        .map_err(|e| StoreError::Internal(format!("blocking task failed: {}", e)))?
    }
}

/// Raises the abandonment flag when the awaiting future is dropped. On
/// normal completion the closure has already returned, so the late store
/// is harmless.
struct AbandonGuard(Arc<AtomicBool>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

fn abandoned_err() -> StoreError {
    StoreError::Internal("caller abandoned the call before commit".to_string())
}

/// Resolve the governed-tables namespace, failing if unprovisioned.
fn namespace(conn: &Connection, instance: InstanceId) -> Result<String> {
    if !schema::is_provisioned(conn, instance)? {
        return Err(StoreError::NotProvisioned(instance.as_u64()));
    }
    schema::physical_name(instance, LogicalKind::Tables)
}

fn parse_document(doc: &str) -> Result<BTreeMap<String, String>> {
    Ok(serde_json::from_str(doc)?)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

#[async_trait]
impl PermissionStore for SqlitePermissionStore {
    async fn provision(&self, instance: InstanceId) -> Result<()> {
        self.with_conn(move |conn, _abandoned| {
            schema::provision_namespace(conn, instance)?;
            debug!(instance = instance.as_u64(), "provisioned permission namespace");
            Ok(())
        })
        .await
    }

    async fn create(&self, instance: InstanceId, record: &PermissionRecord) -> Result<()> {
        let record = record.clone();
        self.with_conn(move |conn, abandoned| {
            let table = namespace(conn, instance)?;
            let doc = serde_json::to_string(&record.column_permissions)?;

            if abandoned.load(Ordering::Acquire) {
                return Err(abandoned_err());
            }
            let result = conn.execute(
                &format!(
                    r#"INSERT INTO "{table}"
                       (name, column_permissions, conditions, rollback_version)
                       VALUES (?1, ?2, ?3, ?4)"#
                ),
                params![
                    record.name,
                    doc,
                    record.table_condition,
                    record.rollback_version as i64
                ],
            );

            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists {
                        instance: instance.as_u64(),
                        table: record.name.clone(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn exists_by_name(&self, instance: InstanceId, table: &str) -> Result<bool> {
        let table = table.to_string();
        self.with_conn(move |conn, _abandoned| {
            let ns = namespace(conn, instance)?;
            let exists: bool = conn.query_row(
                &format!(r#"SELECT EXISTS(SELECT 1 FROM "{ns}" WHERE name = ?1)"#),
                params![table],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn get_by_name(&self, instance: InstanceId, table: &str) -> Result<PermissionRecord> {
        let table = table.to_string();
        self.with_conn(move |conn, _abandoned| {
            let ns = namespace(conn, instance)?;
            let row = conn
                .query_row(
                    &format!(
                        r#"SELECT name, column_permissions, conditions, rollback_version
                           FROM "{ns}" WHERE name = ?1"#
                    ),
                    params![table],
                    row_to_record,
                )
                .optional()?;

            let (name, doc, conditions, version) = row.ok_or_else(|| StoreError::NotFound {
                instance: instance.as_u64(),
                table: table.clone(),
            })?;

            Ok(PermissionRecord {
                name,
                column_permissions: parse_document(&doc)?,
                table_condition: conditions,
                rollback_version: version as u64,
            })
        })
        .await
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
        let table = table.to_string();
        let action = action.to_string();
        let condition = condition.to_string();
        self.with_conn(move |conn, abandoned| {
            let ns = namespace(conn, instance)?;
            let tx = conn.transaction()?;

            let row = tx
                .query_row(
                    &format!(
                        r#"SELECT column_permissions, rollback_version
                           FROM "{ns}" WHERE name = ?1"#
                    ),
                    params![table],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()?;

            let (doc, stored) = row.ok_or_else(|| StoreError::NotFound {
                instance: instance.as_u64(),
                table: table.clone(),
            })?;
            let stored = stored as u64;

            if rollback_version < stored {
                return Err(StoreError::StaleVersion {
                    table: table.clone(),
                    stored,
                    supplied: rollback_version,
                });
            }

            let mut permissions = parse_document(&doc)?;
            permissions.insert(action.clone(), condition);
            let doc = serde_json::to_string(&permissions)?;

            let affected = tx.execute(
                &format!(
                    r#"UPDATE "{ns}" SET column_permissions = ?1, rollback_version = ?2
                       WHERE name = ?3"#
                ),
                params![doc, rollback_version as i64, table],
            )?;

            // The caller gave up while this write was queued; drop the
            // transaction instead of committing it.
            if abandoned.load(Ordering::Acquire) {
                return Err(abandoned_err());
            }
            tx.commit()?;
            debug!(
                instance = instance.as_u64(),
                table = %table,
                action = %action,
                rollback_version,
                "updated action condition"
            );
            Ok(affected as u64)
        })
        .await
    }
}
