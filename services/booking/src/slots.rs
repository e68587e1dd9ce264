//! Slot registry
//!
//! Owns the fixed-size availability board. Every mutation is a
//! conditional write retried a bounded number of times, so two
//! concurrent reservations of the same slot can never both succeed:
//! the loser either observes the slot taken on re-read or exhausts
//! its retry budget.

use crate::store::{backoff, KvStore, Revision, CAS_ATTEMPTS};
use std::sync::Arc;
use types::errors::{KvError, SlotError};
use types::slot::{SlotBoard, SlotIndex};

/// Blob key holding the availability board
pub const SLOTS_KEY: &str = "commission-slots/status";

/// Outcome of a reservation attempt, with the board the caller should
/// report either way
#[derive(Debug, Clone, PartialEq)]
pub enum ReserveOutcome {
    /// The slot was free and this caller took it
    Reserved(SlotBoard),
    /// The slot was already taken by the time of the authoritative check
    Taken(SlotBoard),
}

pub struct SlotRegistry {
    store: Arc<dyn KvStore>,
}

impl SlotRegistry {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current availability board; all-free when never written
    pub async fn read(&self) -> Result<SlotBoard, SlotError> {
        let (board, _) = self.load().await?;
        Ok(board)
    }

    /// Atomically reserve one slot.
    ///
    /// Read-check-write under a revision token: commit only if the
    /// board is unchanged and the slot still free. Revision conflicts
    /// are retried with jittered backoff; a slot observed taken is
    /// reported definitively, never retried.
    pub async fn try_reserve(&self, index: SlotIndex) -> Result<ReserveOutcome, SlotError> {
        for attempt in 0..CAS_ATTEMPTS {
            let (mut board, revision) = self.load().await?;
            if !board.is_free(index) {
                return Ok(ReserveOutcome::Taken(board));
            }
            board.set(index, false);
            match self.commit(&board, revision).await {
                Ok(()) => {
                    tracing::debug!(slot = %index, "slot reserved");
                    return Ok(ReserveOutcome::Reserved(board));
                }
                Err(KvError::Conflict) => backoff(attempt).await,
                Err(e) => return Err(SlotError::Storage(e)),
            }
        }
        Err(SlotError::Contended)
    }

    /// Mark a slot free. Idempotent: succeeds without a write when the
    /// slot is already free.
    pub async fn free(&self, index: SlotIndex) -> Result<SlotBoard, SlotError> {
        self.set_explicit(index, true).await
    }

    /// Admin override of one slot's availability. Same CAS loop as
    /// reservation but "already in target state" is a no-op success.
    pub async fn set_explicit(
        &self,
        index: SlotIndex,
        available: bool,
    ) -> Result<SlotBoard, SlotError> {
        for attempt in 0..CAS_ATTEMPTS {
            let (mut board, revision) = self.load().await?;
            if board.is_free(index) == available {
                return Ok(board);
            }
            board.set(index, available);
            match self.commit(&board, revision).await {
                Ok(()) => {
                    tracing::debug!(slot = %index, available, "slot availability set");
                    return Ok(board);
                }
                Err(KvError::Conflict) => backoff(attempt).await,
                Err(e) => return Err(SlotError::Storage(e)),
            }
        }
        Err(SlotError::Contended)
    }

    async fn load(&self) -> Result<(SlotBoard, Option<Revision>), SlotError> {
        match self.store.fetch(SLOTS_KEY).await.map_err(SlotError::Storage)? {
            Some(versioned) => {
                let board = serde_json::from_value(versioned.value)
                    .map_err(|e| SlotError::Storage(KvError::Unavailable(e.to_string())))?;
                Ok((board, Some(versioned.revision)))
            }
            None => Ok((SlotBoard::all_free(), None)),
        }
    }

    async fn commit(&self, board: &SlotBoard, revision: Option<Revision>) -> Result<(), KvError> {
        let value = serde_json::to_value(board)
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        self.store.put(SLOTS_KEY, value, revision).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, VersionedValue};
    use async_trait::async_trait;
    use serde_json::Value;

    fn registry() -> SlotRegistry {
        SlotRegistry::new(Arc::new(MemoryStore::new()))
    }

    fn idx(i: i64) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    #[tokio::test]
    async fn test_read_defaults_all_free() {
        let registry = registry();
        assert_eq!(registry.read().await.unwrap(), SlotBoard::all_free());
    }

    #[tokio::test]
    async fn test_reserve_free_slot() {
        let registry = registry();
        match registry.try_reserve(idx(2)).await.unwrap() {
            ReserveOutcome::Reserved(board) => {
                assert_eq!(board.slots(), &[true, true, false, true]);
            }
            other => panic!("expected Reserved, got {other:?}"),
        }
        assert!(!registry.read().await.unwrap().is_free(idx(2)));
    }

    #[tokio::test]
    async fn test_reserve_taken_slot_is_definitive() {
        let registry = registry();
        registry.try_reserve(idx(0)).await.unwrap();
        match registry.try_reserve(idx(0)).await.unwrap() {
            ReserveOutcome::Taken(board) => assert!(!board.is_free(idx(0))),
            other => panic!("expected Taken, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_free_then_reserve_succeeds() {
        let registry = registry();
        registry.try_reserve(idx(1)).await.unwrap();
        let board = registry.free(idx(1)).await.unwrap();
        assert!(board.is_free(idx(1)));
        assert!(matches!(
            registry.try_reserve(idx(1)).await.unwrap(),
            ReserveOutcome::Reserved(_)
        ));
    }

    #[tokio::test]
    async fn test_free_is_idempotent() {
        let registry = registry();
        let board1 = registry.free(idx(3)).await.unwrap();
        let board2 = registry.free(idx(3)).await.unwrap();
        assert_eq!(board1, board2);
        assert!(board2.is_free(idx(3)));
    }

    #[tokio::test]
    async fn test_set_explicit_override() {
        let registry = registry();
        let board = registry.set_explicit(idx(0), false).await.unwrap();
        assert!(!board.is_free(idx(0)));
        let board = registry.set_explicit(idx(0), true).await.unwrap();
        assert!(board.is_free(idx(0)));
    }

    /// Store whose writes always lose the revision race
    struct AlwaysConflicting;

    #[async_trait]
    impl KvStore for AlwaysConflicting {
        async fn fetch(&self, _key: &str) -> Result<Option<VersionedValue>, KvError> {
            Ok(None)
        }

        async fn put(
            &self,
            _key: &str,
            _value: Value,
            _expected: Option<Revision>,
        ) -> Result<Revision, KvError> {
            Err(KvError::Conflict)
        }
    }

    #[tokio::test]
    async fn test_retries_exhausted_surface_contended() {
        let registry = SlotRegistry::new(Arc::new(AlwaysConflicting));
        let err = registry.try_reserve(idx(0)).await.unwrap_err();
        assert_eq!(err, SlotError::Contended);
    }
}
