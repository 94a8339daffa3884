//! Item key generation.

use uuid::Uuid;

/// Mint a fresh opaque item key.
///
/// Keys are random v4 UUIDs, so collision probability is negligible across
/// the service's lifetime and no read-before-write uniqueness check is made
/// against the store.
///
/// # Returns
/// A hyphenated lowercase UUID string.
pub fn new_key() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::new_key;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_across_repeated_calls() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(new_key()), "duplicate key minted");
        }
    }

    #[test]
    fn keys_are_uuid_shaped() {
        let key = new_key();
        assert_eq!(key.len(), 36);
        assert!(key
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-'));
    }
}
