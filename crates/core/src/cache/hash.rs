//! Cache entry key generation.

use sha2::{Digest, Sha256};

/// Key of the entry for `url` inside the namespace `cache_name`.
///
/// The same URL stored under two namespaces yields two distinct keys.
pub fn compute_entry_key(cache_name: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cache_name.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
