//! Namespace id derivation

use sha2::{Digest, Sha256};

/// Derive the namespace id for a caller key: `<prefix>:<hex sha256(key)>`
///
/// Same key, same id. The hash only buckets keys; it is not a security boundary.
pub fn namespace_id(prefix: &str, key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{}:{}", prefix, hex::encode(digest))
}
