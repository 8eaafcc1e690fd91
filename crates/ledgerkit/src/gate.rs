//! The access gate: transaction authentication wired to table governance.
//!
//! A validating node re-hashes a submitted transaction, verifies its
//! signature, and — when the transaction touches a governed table —
//! fetches the relevant condition expression and delegates the
//! accept/reject decision to the external condition evaluator.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use ledgerkit_crypto::{
    ConfigError, Hasher, PublicKey, SignatureProvider,
};
use ledgerkit_perms::{InstanceId, PermissionRecord, PermissionStore};

use crate::error::{EvalError, Result};

/// Outcome of evaluating a condition expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Context handed to the condition evaluator alongside the expression.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// The ledger instance the transaction runs in.
    pub instance: InstanceId,
    /// The governed table being touched.
    pub table: String,
    /// The action being performed.
    pub action: String,
    /// The verified signer.
    pub signer: PublicKey,
}

/// The external execution engine that interprets stored condition
/// expressions at transaction-apply time. Consumed by this gate, not
/// implemented by it.
#[async_trait]
pub trait ConditionEvaluator: Send + Sync {
    /// Evaluate `expression` against `ctx`, granting or denying the action.
    async fn evaluate(
        &self,
        expression: &str,
        ctx: &EvalContext,
    ) -> std::result::Result<Decision, EvalError>;
}

/// The governed table and action a transaction touches, if any.
#[derive(Debug, Clone)]
pub struct TableScope {
    pub instance: InstanceId,
    pub table: String,
    pub action: String,
}

/// A submitted transaction as it arrives off the wire.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// The transaction payload the client hashed and signed.
    pub payload: Vec<u8>,
    /// The signer's public key, X‖Y bytes.
    pub public_key: Vec<u8>,
    /// The fixed-width signature bytes.
    pub signature: Vec<u8>,
    /// Governed-table scope, when the transaction touches one.
    pub scope: Option<TableScope>,
}

/// Configuration for the access gate. Resolved once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Name of the signature scheme to verify with.
    pub scheme: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            scheme: "ecdsa-p256".to_string(),
        }
    }
}

/// Authenticates transactions and governs table access.
///
/// Built once per validating node. Signature verification is pure and
/// runs in parallel across workers; permission lookups always re-read the
/// store so every decision sees current governance data.
pub struct AccessGate<S: PermissionStore> {
    provider: SignatureProvider,
    store: Arc<S>,
    evaluator: Arc<dyn ConditionEvaluator>,
}

impl<S: PermissionStore> AccessGate<S> {
    /// Create a gate from configuration.
    ///
    /// An unknown scheme aborts construction with [`ConfigError`]; it is
    /// never surfaced per call.
    pub fn new(
        config: &GateConfig,
        hasher: Arc<dyn Hasher>,
        store: Arc<S>,
        evaluator: Arc<dyn ConditionEvaluator>,
    ) -> std::result::Result<Self, ConfigError> {
        let provider = SignatureProvider::from_name(&config.scheme, hasher)?;
        Ok(Self {
            provider,
            store,
            evaluator,
        })
    }

    /// The configured signature provider.
    pub fn provider(&self) -> &SignatureProvider {
        &self.provider
    }

    /// The permission store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticate `tx` and decide whether its table action is allowed.
    ///
    /// Signature failures, missing records, and store failures all
    /// propagate; the caller decides reject vs. retry. A transaction that
    /// touches no governed table is allowed once its signature checks out.
    pub async fn authorize(&self, tx: &SignedTransaction) -> Result<Decision> {
        self.provider
            .verify(&tx.public_key, &tx.payload, &tx.signature)?;

        let Some(scope) = &tx.scope else {
            return Ok(Decision::Allow);
        };

        let record = self.store.get_by_name(scope.instance, &scope.table).await?;
        let ctx = EvalContext {
            instance: scope.instance,
            table: scope.table.clone(),
            action: scope.action.clone(),
            // Already validated by verify above.
            signer: PublicKey::from_slice(&tx.public_key)?,
        };

        let Some(expression) = effective_condition(&record, &scope.action) else {
            debug!(
                instance = scope.instance.as_u64(),
                table = %scope.table,
                action = %scope.action,
                "no condition stored, denying by default"
            );
            return Ok(Decision::Deny);
        };

        Ok(self.evaluator.evaluate(expression, &ctx).await?)
    }

    /// Provision the permission namespace for a ledger instance.
    pub async fn provision(&self, instance: InstanceId) -> Result<()> {
        Ok(self.store.provision(instance).await?)
    }

    /// Declare a governed table.
    pub async fn declare_table(
        &self,
        instance: InstanceId,
        record: &PermissionRecord,
    ) -> Result<()> {
        Ok(self.store.create(instance, record).await?)
    }

    /// Overwrite one action's condition expression, bumping the rollback
    /// version atomically with it.
    pub async fn set_action(
        &self,
        instance: InstanceId,
        table: &str,
        action: &str,
        condition: &str,
        rollback_version: u64,
    ) -> Result<u64> {
        Ok(self
            .store
            .set_action(instance, table, action, condition, rollback_version)
            .await?)
    }
}

/// The condition governing `action`: the action's own entry, falling back
/// to the table-level condition. Empty expressions count as absent.
fn effective_condition<'a>(record: &'a PermissionRecord, action: &str) -> Option<&'a str> {
    record
        .action_condition(action)
        .filter(|c| !c.is_empty())
        .or_else(|| {
            let table_cond = record.table_condition.as_str();
            (!table_cond.is_empty()).then_some(table_cond)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_condition_prefers_action_entry() {
        let record = PermissionRecord::new("contracts")
            .with_table_condition("role=validator")
            .with_action("read", "true");

        assert_eq!(effective_condition(&record, "read"), Some("true"));
        assert_eq!(effective_condition(&record, "write"), Some("role=validator"));
    }

    #[test]
    fn test_effective_condition_empty_is_absent() {
        let record = PermissionRecord::new("contracts").with_action("read", "");
        assert_eq!(effective_condition(&record, "read"), None);
    }
}
