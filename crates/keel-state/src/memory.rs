//! In-memory state store for tests.

use std::collections::BTreeMap;

use keel_types::Timestamp;

use crate::ledger::LedgerState;
use crate::Result;

/// An in-memory [`LedgerState`] with a settable transaction timestamp.
///
/// Stands in for the platform store in unit and integration tests. `Clone`
/// lets a test checkpoint the store before an operation and restore it
/// afterwards, emulating the platform-level abort of a failed transaction.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<String, Vec<u8>>,
    tx_time: Timestamp,
}

impl MemoryLedger {
    /// Empty store with the transaction timestamp at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store reporting `tx_time` as the transaction timestamp.
    pub fn at_time(tx_time: Timestamp) -> Self {
        Self {
            entries: BTreeMap::new(),
            tx_time,
        }
    }

    /// Set the timestamp reported for subsequent operations.
    pub fn set_tx_time(&mut self, tx_time: Timestamp) {
        self.tx_time = tx_time;
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerState for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn tx_timestamp(&self) -> Result<Timestamp> {
        Ok(self.tx_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_what_put_stored() {
        let mut state = MemoryLedger::new();
        state.put("k", b"v").expect("put");

        let value = state.get("k").expect("get");
        assert_eq!(value.as_deref(), Some(b"v".as_slice()));
        assert_eq!(state.get("missing").expect("get"), None);
    }

    #[test]
    fn test_tx_timestamp_is_settable() {
        let mut state = MemoryLedger::at_time(1_700_000_000);
        assert_eq!(state.tx_timestamp().expect("timestamp"), 1_700_000_000);

        state.set_tx_time(1_700_003_600);
        assert_eq!(state.tx_timestamp().expect("timestamp"), 1_700_003_600);
    }

    #[test]
    fn test_clone_checkpoints_the_store() {
        let mut state = MemoryLedger::new();
        state.put("k", b"before").expect("put");

        let checkpoint = state.clone();
        state.put("k", b"after").expect("put");

        assert_eq!(
            checkpoint.get("k").expect("get").as_deref(),
            Some(b"before".as_slice())
        );
    }
}
