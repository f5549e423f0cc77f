//! Canonical serialization for stable parameter hashes.
//!
//! Fingerprint options, topic settings and run configurations are hashed so
//! that a run's log can be matched against the records it produced. Two runs
//! with the same settings log the same hash.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order
//! - Maps in hashed data must be `BTreeMap`

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    // Only called on plain derived structs with string keys.
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// xxHash64 of the canonical bytes.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Canonical hash as a 16-character hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Options {
        ignore_head: bool,
        strategy: String,
    }

    #[test]
    fn test_hash_is_stable() {
        let a = Options { ignore_head: true, strategy: "default".into() };
        let b = Options { ignore_head: true, strategy: "default".into() };
        assert_eq!(canonical_hash_hex(&a), canonical_hash_hex(&b));
        assert_eq!(canonical_hash_hex(&a).len(), 16);
    }

    #[test]
    fn test_hash_tracks_fields() {
        let a = Options { ignore_head: true, strategy: "default".into() };
        let b = Options { ignore_head: false, strategy: "default".into() };
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }
}
