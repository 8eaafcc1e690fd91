//! SQLite schema management: registry migration and per-instance
//! namespace provisioning.
//!
//! Namespace identifiers are resolved from the typed (instance, kind)
//! pair and checked against an allow-listed pattern before they are ever
//! spliced into DDL; all row-level statements are parameterized.

use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::record::{InstanceId, LogicalKind};

/// Current registry schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the registry schema. Idempotent.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;
        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;
            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }
        tx.commit()?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::InvalidDocument(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: the namespace registry.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per provisioned ledger instance
        CREATE TABLE namespaces (
            instance_id INTEGER PRIMARY KEY,
            provisioned_at INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Resolve the physical table name for a typed namespace key.
///
/// The result always matches the identifier allow-list because the
/// instance component is numeric by construction; the check stays as a
/// guard against future key kinds widening the pattern.
pub(crate) fn physical_name(instance: InstanceId, kind: LogicalKind) -> Result<String> {
    let name = format!("{}_{}", instance.as_u64(), kind.suffix());
    if !is_allowed_identifier(&name) {
        return Err(StoreError::InvalidDocument(format!(
            "namespace identifier {:?} rejected",
            name
        )));
    }
    Ok(name)
}

/// Allow-list for namespace identifiers: digits, one underscore, ascii
/// lowercase suffix.
fn is_allowed_identifier(name: &str) -> bool {
    let Some((instance, suffix)) = name.split_once('_') else {
        return false;
    };
    !instance.is_empty()
        && instance.bytes().all(|b| b.is_ascii_digit())
        && !suffix.is_empty()
        && suffix.bytes().all(|b| b.is_ascii_lowercase())
}

/// Create the governance namespace for one instance if absent.
pub(crate) fn provision_namespace(conn: &mut Connection, instance: InstanceId) -> Result<()> {
    let table = physical_name(instance, LogicalKind::Tables)?;
    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{table}" (
            name TEXT PRIMARY KEY NOT NULL,
            column_permissions TEXT NOT NULL DEFAULT '{{}}',
            conditions TEXT NOT NULL DEFAULT '',
            rollback_version INTEGER NOT NULL DEFAULT 0
        );
        "#
    ))?;

    tx.execute(
        "INSERT OR IGNORE INTO namespaces (instance_id, provisioned_at) VALUES (?1, ?2)",
        rusqlite::params![instance.as_u64() as i64, now_millis()],
    )?;

    tx.commit()?;
    Ok(())
}

/// Check whether an instance has been provisioned.
pub(crate) fn is_provisioned(conn: &Connection, instance: InstanceId) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM namespaces WHERE instance_id = ?1)",
        rusqlite::params![instance.as_u64() as i64],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_provision_creates_namespace() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        provision_namespace(&mut conn, InstanceId::new(1)).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"1_tables".to_string()));
        assert!(tables.contains(&"namespaces".to_string()));
        assert!(is_provisioned(&conn, InstanceId::new(1)).unwrap());
        assert!(!is_provisioned(&conn, InstanceId::new(2)).unwrap());
    }

    #[test]
    fn test_provision_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        provision_namespace(&mut conn, InstanceId::new(1)).unwrap();
        provision_namespace(&mut conn, InstanceId::new(1)).unwrap();
    }

    #[test]
    fn test_identifier_allow_list() {
        assert!(is_allowed_identifier("1_tables"));
        assert!(is_allowed_identifier("42_tables"));
        assert!(!is_allowed_identifier("tables"));
        assert!(!is_allowed_identifier("_tables"));
        assert!(!is_allowed_identifier("1_"));
        assert!(!is_allowed_identifier("1_Tables"));
        assert!(!is_allowed_identifier("1_tables; DROP TABLE namespaces"));
    }

    #[test]
    fn test_physical_name_resolution() {
        let name = physical_name(InstanceId::new(9), LogicalKind::Tables).unwrap();
        assert_eq!(name, "9_tables");
    }
}
