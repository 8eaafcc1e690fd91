//! Golden codec vectors.
//!
//! Pin the fixed-width signature encoding so it stays byte-identical with
//! externally (e.g. browser-) produced signatures across releases.

use ledgerkit_crypto::SignatureBytes;

/// A golden codec vector: a wire signature and its expected coordinates.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The 128-character wire form.
    pub hex: &'static str,
    /// Expected r coordinate, left-zero-padded hex.
    pub r_hex: &'static str,
    /// Expected s coordinate, left-zero-padded hex.
    pub s_hex: &'static str,
}

/// Get all golden codec vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "distinct coordinates",
            hex: "a1a2a3a4a5a6a7a8a9aaabacadaeafb0b1b2b3b4b5b6b7b8b9babbbcbdbebfc0\
                  0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20",
            r_hex: "a1a2a3a4a5a6a7a8a9aaabacadaeafb0b1b2b3b4b5b6b7b8b9babbbcbdbebfc0",
            s_hex: "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20",
        },
        GoldenVector {
            name: "short coordinates are left-zero-padded",
            hex: "0000000000000000000000000000000000000000000000000000000000000001\
                  00000000000000000000000000000000000000000000000000000000000000ff",
            r_hex: "0000000000000000000000000000000000000000000000000000000000000001",
            s_hex: "00000000000000000000000000000000000000000000000000000000000000ff",
        },
        GoldenVector {
            name: "all-ones signature",
            hex: "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                  ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            r_hex: "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
            s_hex: "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        },
    ]
}

/// Verify all golden vectors decode to their expected coordinates and
/// round-trip back to the wire form.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| {
            let ok = match SignatureBytes::from_hex(v.hex) {
                Ok(sig) => {
                    hex::encode(sig.r()) == v.r_hex
                        && hex::encode(sig.s()) == v.s_hex
                        && sig.to_hex() == v.hex
                }
                Err(_) => false,
            };
            (v.name.to_string(), ok)
        })
        .collect()
}
