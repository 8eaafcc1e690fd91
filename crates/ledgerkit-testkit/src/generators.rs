//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledgerkit_crypto::{PrivateKey, SignatureBytes, SIGNATURE_SIZE};
use ledgerkit_perms::PermissionRecord;

/// Generate a valid private key from a one-byte seed.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    any::<u8>().prop_map(crate::fixtures::deterministic_key)
}

/// Generate raw 64-byte signature material (not necessarily a valid
/// curve signature).
pub fn signature_bytes() -> impl Strategy<Value = SignatureBytes> {
    prop::collection::vec(any::<u8>(), SIGNATURE_SIZE).prop_map(|bytes| {
        let mut arr = [0u8; SIGNATURE_SIZE];
        arr.copy_from_slice(&bytes);
        SignatureBytes::from_bytes(arr)
    })
}

/// Generate a 128-character hex signature string.
pub fn signature_hex() -> impl Strategy<Value = String> {
    signature_bytes().prop_map(|sig| sig.to_hex())
}

/// Generate an action name.
pub fn action_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}".prop_map(String::from)
}

/// Generate a governed table name.
pub fn table_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,31}".prop_map(String::from)
}

/// Generate a condition expression.
pub fn condition_expr() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        "[a-z]{1,8}=[a-z0-9]{1,8}".prop_map(String::from),
    ]
}

/// Generate a permission record with up to eight action conditions.
pub fn permission_record() -> impl Strategy<Value = PermissionRecord> {
    (
        table_name(),
        prop::collection::btree_map(action_name(), condition_expr(), 0..8),
        condition_expr(),
        0u64..1000,
    )
        .prop_map(|(name, column_permissions, table_condition, rollback_version)| {
            PermissionRecord {
                name,
                column_permissions,
                table_condition,
                rollback_version,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_signature_hex_roundtrips(hex in signature_hex()) {
            let sig = SignatureBytes::from_hex(&hex).unwrap();
            prop_assert_eq!(sig.to_hex(), hex);
        }

        #[test]
        fn test_generated_records_have_bounded_versions(record in permission_record()) {
            prop_assert!(record.rollback_version < 1000);
            prop_assert!(!record.name.is_empty());
        }

        #[test]
        fn test_private_keys_sign(key in private_key()) {
            // Every generated key must be a usable scalar.
            prop_assert_eq!(key.public_key().as_bytes().len(), 64);
        }
    }
}
