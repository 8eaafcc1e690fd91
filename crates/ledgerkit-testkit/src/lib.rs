//! # Ledgerkit Testkit
//!
//! Testing utilities for ledgerkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known signature encodings with expected coordinates for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the fixed-width wire encoding across implementations:
//!
//! ```rust
//! use ledgerkit_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok) in verify_all_vectors() {
//!     assert!(ok, "vector {} failed", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerkit_testkit::generators::permission_record;
//!
//! proptest! {
//!     #[test]
//!     fn records_serialize(record in permission_record()) {
//!         prop_assert!(serde_json::to_string(&record).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use ledgerkit_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signature = fixture.provider.sign(&fixture.key, b"payload").unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    deterministic_key, random_key, Blake3Hasher, FailingHasher, StaticEvaluator, TestFixture,
};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
