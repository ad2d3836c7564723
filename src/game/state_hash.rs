//! Deterministic state hashing
//!
//! Two runs with the same seed, decks and strategies must reach identical
//! tabletops. Hashing the canonical JSON form makes that cheap to compare.

use crate::game::Tabletop;
use crate::Result;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a deterministic hash of the tabletop
///
/// The logger is not serialized, so presentation settings never affect the
/// hash. Object keys come out of `serde_json::Value` sorted, which makes the
/// string canonical even though card storage is hash-ordered.
pub fn compute_state_hash(table: &Tabletop) -> Result<u64> {
    let value = serde_json::to_value(table)?;
    let canonical = serde_json::to_string(&value)?;

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok(hasher.finish())
}

/// Format a hash as a short hex string for logging
pub fn format_hash(hash: u64) -> String {
    format!("{:016x}", hash)
}
