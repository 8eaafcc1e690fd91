//! Strong types for the permission registry.
//!
//! Instance and namespace identifiers are newtypes so physical table names
//! can only be resolved inside the storage layer, never string-formatted
//! at call sites.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A logical partition of the ledger with its own governed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Create from a raw instance number.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw instance number.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for InstanceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The kind of per-instance namespace.
///
/// Only table governance exists in this core; the enum keeps the physical
/// name resolution typed rather than ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKind {
    /// Table governance records.
    Tables,
}

impl LogicalKind {
    /// The namespace suffix for this kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
        }
    }
}

/// A table governance record, keyed by (instance, table name).
///
/// Exactly one record exists per key. `rollback_version` never decreases;
/// it is bumped on every mutation so later governance changes can be
/// undone in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// The governed table's name.
    pub name: String,

    /// Condition expression per action/column key. Keys are unique; the
    /// expressions are interpreted by an external execution engine.
    pub column_permissions: BTreeMap<String, String>,

    /// Overall table-level condition expression.
    pub table_condition: String,

    /// Monotonic governance-change marker.
    pub rollback_version: u64,
}

impl PermissionRecord {
    /// Create a record with no per-action conditions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_permissions: BTreeMap::new(),
            table_condition: String::new(),
            rollback_version: 0,
        }
    }

    /// Set the table-level condition.
    pub fn with_table_condition(mut self, condition: impl Into<String>) -> Self {
        self.table_condition = condition.into();
        self
    }

    /// Add an action condition.
    pub fn with_action(mut self, action: impl Into<String>, condition: impl Into<String>) -> Self {
        self.column_permissions.insert(action.into(), condition.into());
        self
    }

    /// Look up the condition for one action, if any.
    pub fn action_condition(&self, action: &str) -> Option<&str> {
        self.column_permissions.get(action).map(String::as_str)
    }
}
