//! The ledger state-store trait and composite-key scheme.

use keel_types::Timestamp;

use crate::Result;

/// Separator between composite-key segments.
///
/// U+0000 cannot occur in attribute values, so joined keys cannot collide
/// across segment boundaries.
const KEY_SEPARATOR: char = '\u{0}';

/// Key/value state store provided by the surrounding ledger platform.
///
/// One module operation runs inside one platform transaction: reads observe
/// earlier writes of the same transaction, and atomicity across all writes
/// (commit everything or abort everything) is the platform's job. The
/// transaction timestamp is exposed here so operations never read the wall
/// clock.
pub trait LedgerState {
    /// Read the raw bytes stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// - [`StateError::Backend`](crate::StateError::Backend) if the store
    ///   fails the read
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// - [`StateError::Backend`](crate::StateError::Backend) if the store
    ///   rejects the write
    fn put(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Timestamp of the enclosing transaction, in Unix epoch seconds.
    ///
    /// Identical for every read within one transaction, which is what makes
    /// time-dependent operations replay-stable.
    fn tx_timestamp(&self) -> Result<Timestamp>;
}

/// Build a deterministic state key from an entity kind and its identifying
/// attributes.
///
/// `composite_key("prices", ["a:b", "c"])` and
/// `composite_key("prices", ["a", "b:c"])` stay distinct because segments
/// are joined with U+0000 rather than a printable separator.
pub fn composite_key(kind: &str, attrs: &[&str]) -> String {
    let mut key = String::from(kind);
    for attr in attrs {
        key.push(KEY_SEPARATOR);
        key.push_str(attr);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key_joins_segments() {
        let key = composite_key("oracle", &["addr-1"]);
        assert_eq!(key, "oracle\u{0}addr-1");
    }

    #[test]
    fn test_composite_key_segments_cannot_bleed() {
        let left = composite_key("prices", &["KEEL:17", "3600"]);
        let right = composite_key("prices", &["KEEL", "17:3600"]);
        assert_ne!(left, right);
    }

    #[test]
    fn test_composite_key_without_attrs_is_the_kind() {
        assert_eq!(composite_key("config", &[]), "config");
    }
}
