//! Key-value blob store boundary
//!
//! The storage engine itself is an external collaborator; this module
//! defines the contract the booking engine needs from it: strongly
//! consistent reads and conditional writes keyed on a revision token.
//! An unconditional read-then-write over this store is vulnerable to
//! lost updates, so every mutation in this crate goes through
//! `put(.., expected)`.

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use types::errors::KvError;

/// Opaque revision token, increases on every successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision(u64);

/// A stored value together with the revision it was read at
#[derive(Debug, Clone)]
pub struct VersionedValue {
    pub value: Value,
    pub revision: Revision,
}

/// Strongly consistent get/put-by-key store with conditional writes
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Strongly consistent read of one key
    async fn fetch(&self, key: &str) -> Result<Option<VersionedValue>, KvError>;

    /// Conditional write.
    ///
    /// `expected = None` creates the key and fails with
    /// [`KvError::Conflict`] if it already exists; `Some(rev)` commits
    /// only while the stored revision still equals `rev`.
    async fn put(
        &self,
        key: &str,
        value: Value,
        expected: Option<Revision>,
    ) -> Result<Revision, KvError>;
}

/// Number of conditional-write attempts before giving up
pub(crate) const CAS_ATTEMPTS: u32 = 3;

const BACKOFF_BASE_MS: u64 = 10;

/// Jittered backoff between CAS attempts, bounded so contention never
/// turns into unbounded latency
pub(crate) async fn backoff(attempt: u32) {
    let base = BACKOFF_BASE_MS << attempt;
    let jitter = rand::thread_rng().gen_range(0..BACKOFF_BASE_MS);
    tokio::time::sleep(Duration::from_millis(base + jitter)).await;
}

/// In-process store with real CAS semantics
///
/// Used by the binary and the test suite; a production blob-store
/// adapter implements the same trait at deployment.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (u64, Value)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn fetch(&self, key: &str) -> Result<Option<VersionedValue>, KvError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| KvError::Unavailable("store lock poisoned".to_string()))?;
        Ok(entries.get(key).map(|(rev, value)| VersionedValue {
            value: value.clone(),
            revision: Revision(*rev),
        }))
    }

    async fn put(
        &self,
        key: &str,
        value: Value,
        expected: Option<Revision>,
    ) -> Result<Revision, KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KvError::Unavailable("store lock poisoned".to_string()))?;
        let current = entries.get(key).map(|(rev, _)| *rev);
        match (current, expected) {
            (None, None) => {}
            (Some(rev), Some(Revision(exp))) if rev == exp => {}
            _ => return Err(KvError::Conflict),
        }
        let next = current.map_or(1, |rev| rev + 1);
        entries.insert(key.to_string(), (next, value));
        Ok(Revision(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_missing_key() {
        let store = MemoryStore::new();
        assert!(store.fetch("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let store = MemoryStore::new();
        let rev = store.put("k", json!({"a": 1}), None).await.unwrap();
        let got = store.fetch("k").await.unwrap().unwrap();
        assert_eq!(got.revision, rev);
        assert_eq!(got.value, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_create_existing_key_conflicts() {
        let store = MemoryStore::new();
        store.put("k", json!(1), None).await.unwrap();
        let err = store.put("k", json!(2), None).await.unwrap_err();
        assert_eq!(err, KvError::Conflict);
    }

    #[tokio::test]
    async fn test_stale_revision_conflicts() {
        let store = MemoryStore::new();
        let rev1 = store.put("k", json!(1), None).await.unwrap();
        let rev2 = store.put("k", json!(2), Some(rev1)).await.unwrap();
        assert_ne!(rev1, rev2);

        // A writer still holding rev1 must lose
        let err = store.put("k", json!(3), Some(rev1)).await.unwrap_err();
        assert_eq!(err, KvError::Conflict);

        let got = store.fetch("k").await.unwrap().unwrap();
        assert_eq!(got.value, json!(2));
    }
}
