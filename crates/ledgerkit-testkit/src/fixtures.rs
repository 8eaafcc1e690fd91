//! Test fixtures and helpers.
//!
//! Common setup code for unit and integration tests: a concrete digest
//! provider, a table-driven condition evaluator, and deterministic keys.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;

use ledgerkit::{ConditionEvaluator, Decision, EvalContext, EvalError};
use ledgerkit_crypto::{HashError, Hasher, PrivateKey, SignatureProvider, DIGEST_SIZE};
use ledgerkit_perms::MemoryPermissionStore;

/// Blake3-backed digest provider for tests.
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> Result<[u8; DIGEST_SIZE], HashError> {
        Ok(*blake3::hash(data).as_bytes())
    }
}

/// A digest provider that always fails, for exercising error paths.
pub struct FailingHasher;

impl Hasher for FailingHasher {
    fn digest(&self, _data: &[u8]) -> Result<[u8; DIGEST_SIZE], HashError> {
        Err(HashError("digest provider offline".to_string()))
    }
}

/// Table-driven condition evaluator.
///
/// Maps expressions to fixed decisions; `"true"` allows by default, every
/// unmapped expression denies.
pub struct StaticEvaluator {
    decisions: HashMap<String, Decision>,
}

impl StaticEvaluator {
    /// Create an evaluator that allows `"true"` and denies everything else.
    pub fn new() -> Self {
        let mut decisions = HashMap::new();
        decisions.insert("true".to_string(), Decision::Allow);
        Self { decisions }
    }

    /// Map an expression to a decision.
    pub fn with_rule(mut self, expression: impl Into<String>, decision: Decision) -> Self {
        self.decisions.insert(expression.into(), decision);
        self
    }
}

impl Default for StaticEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConditionEvaluator for StaticEvaluator {
    async fn evaluate(
        &self,
        expression: &str,
        _ctx: &EvalContext,
    ) -> Result<Decision, EvalError> {
        Ok(self
            .decisions
            .get(expression)
            .copied()
            .unwrap_or(Decision::Deny))
    }
}

/// Derive a valid private scalar from a one-byte seed.
pub fn deterministic_key(seed: u8) -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[0] = 0x11;
    bytes[31] = seed;
    PrivateKey::from_bytes(&bytes).expect("seeded scalar is valid")
}

/// Generate a random private key for tests.
pub fn random_key() -> PrivateKey {
    let mut rng = rand::thread_rng();
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        if let Ok(key) = PrivateKey::from_bytes(&bytes) {
            return key;
        }
    }
}

/// A test fixture with a provider, a deterministic key, and a memory
/// store.
pub struct TestFixture {
    pub provider: SignatureProvider,
    pub key: PrivateKey,
    pub store: MemoryPermissionStore,
}

impl TestFixture {
    /// Create a fixture with the default deterministic key.
    pub fn new() -> Self {
        Self::with_seed(1)
    }

    /// Create a fixture with a specific key seed.
    pub fn with_seed(seed: u8) -> Self {
        Self {
            provider: SignatureProvider::from_name("ecdsa-p256", Arc::new(Blake3Hasher))
                .expect("known scheme"),
            key: deterministic_key(seed),
            store: MemoryPermissionStore::new(),
        }
    }

    /// The fixture key's public half.
    pub fn public_key(&self) -> ledgerkit_crypto::PublicKey {
        self.key.public_key()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_key_is_stable() {
        let k1 = deterministic_key(7);
        let k2 = deterministic_key(7);
        assert_eq!(k1.public_key(), k2.public_key());
        assert_ne!(k1.public_key(), deterministic_key(8).public_key());
    }

    #[test]
    fn test_fixture_sign_verify() {
        let fixture = TestFixture::new();
        let sig = fixture.provider.sign(&fixture.key, b"payload").unwrap();
        fixture
            .provider
            .verify(fixture.public_key().as_bytes(), b"payload", sig.as_ref())
            .unwrap();
    }

    #[tokio::test]
    async fn test_static_evaluator_defaults() {
        let evaluator = StaticEvaluator::new();
        let ctx = EvalContext {
            instance: ledgerkit::InstanceId::new(1),
            table: "contracts".to_string(),
            action: "read".to_string(),
            signer: deterministic_key(1).public_key(),
        };

        assert_eq!(evaluator.evaluate("true", &ctx).await.unwrap(), Decision::Allow);
        assert_eq!(
            evaluator.evaluate("role=admin", &ctx).await.unwrap(),
            Decision::Deny
        );
    }
}
