//! End-to-end gate tests: sign a transaction, run it through the access
//! gate against a live permission store, and check the decision.

use std::sync::Arc;

use ledgerkit::{
    AccessGate, Decision, GateConfig, GateError, InstanceId, PermissionRecord, SignedTransaction,
    TableScope,
};
use ledgerkit::perms::{MemoryPermissionStore, StoreError};
use ledgerkit_crypto::PrivateKey;
use ledgerkit_testkit::{deterministic_key, Blake3Hasher, StaticEvaluator};

const INSTANCE: InstanceId = InstanceId::new(1);

fn make_gate(evaluator: StaticEvaluator) -> AccessGate<MemoryPermissionStore> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    AccessGate::new(
        &GateConfig::default(),
        Arc::new(Blake3Hasher),
        Arc::new(MemoryPermissionStore::new()),
        Arc::new(evaluator),
    )
    .expect("default scheme is known")
}

fn signed_tx(
    gate: &AccessGate<MemoryPermissionStore>,
    key: &PrivateKey,
    payload: &[u8],
    scope: Option<TableScope>,
) -> SignedTransaction {
    let signature = gate.provider().sign(key, payload).expect("signing succeeds");
    SignedTransaction {
        payload: payload.to_vec(),
        public_key: key.public_key().as_bytes().to_vec(),
        signature: signature.as_ref().to_vec(),
        scope,
    }
}

fn scope(table: &str, action: &str) -> Option<TableScope> {
    Some(TableScope {
        instance: INSTANCE,
        table: table.to_string(),
        action: action.to_string(),
    })
}

#[tokio::test]
async fn test_unscoped_transaction_allowed_after_verify() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(1);

    let tx = signed_tx(&gate, &key, b"transfer 10", None);
    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Allow);
}

#[tokio::test]
async fn test_tampered_payload_rejected_before_any_lookup() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(1);

    let mut tx = signed_tx(&gate, &key, b"transfer 10", None);
    tx.payload = b"transfer 9999".to_vec();

    let err = gate.authorize(&tx).await.unwrap_err();
    assert!(matches!(err, GateError::Crypto(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_allow_via_action_condition() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(1);

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(
        INSTANCE,
        &PermissionRecord::new("contracts").with_action("read", "true"),
    )
    .await
    .unwrap();

    let tx = signed_tx(&gate, &key, b"read contracts", scope("contracts", "read"));
    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Allow);
}

#[tokio::test]
async fn test_action_condition_overrides_table_condition() {
    let evaluator = StaticEvaluator::new().with_rule("role=admin", Decision::Deny);
    let gate = make_gate(evaluator);
    let key = deterministic_key(2);

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(
        INSTANCE,
        &PermissionRecord::new("contracts")
            .with_table_condition("true")
            .with_action("write", "role=admin"),
    )
    .await
    .unwrap();

    // "write" hits its own condition and is denied; "read" falls back to
    // the table condition and is allowed.
    let write = signed_tx(&gate, &key, b"w", scope("contracts", "write"));
    assert_eq!(gate.authorize(&write).await.unwrap(), Decision::Deny);

    let read = signed_tx(&gate, &key, b"r", scope("contracts", "read"));
    assert_eq!(gate.authorize(&read).await.unwrap(), Decision::Allow);
}

#[tokio::test]
async fn test_no_stored_condition_denies_by_default() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(3);

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(INSTANCE, &PermissionRecord::new("contracts"))
        .await
        .unwrap();

    let tx = signed_tx(&gate, &key, b"x", scope("contracts", "read"));
    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Deny);
}

#[tokio::test]
async fn test_undeclared_table_is_an_error() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(4);

    gate.provision(INSTANCE).await.unwrap();

    let tx = signed_tx(&gate, &key, b"x", scope("ghost", "read"));
    let err = gate.authorize(&tx).await.unwrap_err();
    assert!(
        matches!(err, GateError::Store(StoreError::NotFound { .. })),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_unprovisioned_instance_is_an_error() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(5);

    let tx = signed_tx(&gate, &key, b"x", scope("contracts", "read"));
    let err = gate.authorize(&tx).await.unwrap_err();
    assert!(
        matches!(err, GateError::Store(StoreError::NotProvisioned(_))),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_set_action_takes_effect_for_later_transactions() {
    let gate = make_gate(StaticEvaluator::new());
    let key = deterministic_key(6);

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(
        INSTANCE,
        &PermissionRecord::new("contracts").with_action("read", "role=nobody"),
    )
    .await
    .unwrap();

    let tx = signed_tx(&gate, &key, b"x", scope("contracts", "read"));
    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Deny);

    let version = gate
        .set_action(INSTANCE, "contracts", "read", "true", 1)
        .await
        .unwrap();
    assert_eq!(version, 1);

    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Allow);
}

#[tokio::test]
async fn test_stale_governance_update_rejected() {
    let gate = make_gate(StaticEvaluator::new());

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(INSTANCE, &PermissionRecord::new("contracts"))
        .await
        .unwrap();

    gate.set_action(INSTANCE, "contracts", "read", "true", 5)
        .await
        .unwrap();

    let err = gate
        .set_action(INSTANCE, "contracts", "read", "false", 3)
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            GateError::Store(StoreError::StaleVersion {
                stored: 5,
                supplied: 3,
                ..
            })
        ),
        "got {:?}",
        err
    );

    // The stale write must not have touched the stored condition.
    let key = deterministic_key(7);
    let tx = signed_tx(&gate, &key, b"x", scope("contracts", "read"));
    assert_eq!(gate.authorize(&tx).await.unwrap(), Decision::Allow);
}

#[tokio::test]
async fn test_wrong_key_rejected_even_when_action_allowed() {
    let gate = make_gate(StaticEvaluator::new());
    let signer = deterministic_key(8);
    let other = deterministic_key(9);

    gate.provision(INSTANCE).await.unwrap();
    gate.declare_table(
        INSTANCE,
        &PermissionRecord::new("contracts").with_action("read", "true"),
    )
    .await
    .unwrap();

    let mut tx = signed_tx(&gate, &signer, b"x", scope("contracts", "read"));
    tx.public_key = other.public_key().as_bytes().to_vec();

    let err = gate.authorize(&tx).await.unwrap_err();
    assert!(matches!(err, GateError::Crypto(_)), "got {:?}", err);
}

#[test]
fn test_unknown_scheme_fails_at_construction() {
    let config = GateConfig {
        scheme: "ed448".to_string(),
    };
    let result = AccessGate::new(
        &config,
        Arc::new(Blake3Hasher),
        Arc::new(MemoryPermissionStore::new()),
        Arc::new(StaticEvaluator::new()),
    );
    assert!(result.is_err());
}
