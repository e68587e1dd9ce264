//! Error taxonomy for the booking backend
//!
//! One enum per component, combined at the coordinator boundary.

use crate::ids::OrderId;
use crate::order::OrderStatus;
use crate::slot::SlotIndex;
use thiserror::Error;

/// Errors from the key-value blob store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KvError {
    /// Conditional write lost: the stored revision no longer matches
    #[error("revision conflict")]
    Conflict,

    /// The store itself failed or is unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Slot registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Revision conflicts persisted through the whole retry budget
    #[error("slot update contended: retries exhausted")]
    Contended,

    #[error("slot storage failure: {0}")]
    Storage(#[source] KvError),
}

/// Order ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("order not found: {0}")]
    NotFound(OrderId),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order storage failure: {0}")]
    Storage(#[source] KvError),
}

/// Payment orchestrator errors
///
/// None of these are retried automatically here; retry policy belongs
/// to the coordinator and the operator re-driving the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// The processor refused the client-credentials exchange
    #[error("payment credential exchange rejected: {0}")]
    AuthRejected(String),

    /// The processor refused the capture/void (e.g. already voided, expired)
    #[error("payment operation failed: {0}")]
    RemoteOperationFailed(String),

    /// Timeout or transport failure: outcome unknown, not a confirmed failure
    #[error("payment processor unreachable: {0}")]
    Unreachable(String),
}

/// Cross-entity errors surfaced by the reservation-payment coordinator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    #[error("slot {0} is not available")]
    SlotTaken(SlotIndex),

    #[error("order not found: {0}")]
    NotFound(OrderId),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Remote capture succeeded but the local status write failed.
    /// Cannot be retried blindly: re-capturing an already-captured
    /// authorization is unsafe without remote idempotency keys.
    #[error("order {id} captured remotely but local status update failed; manual reconciliation required")]
    ReconciliationRequired { id: OrderId },

    /// A reserved slot could not be released after a failed order write;
    /// the slot may be stuck until an admin frees it.
    #[error("slot {slot} may be stuck reserved after a failed order write")]
    PartialFailure { slot: SlotIndex },

    #[error("storage unavailable: {0}")]
    Storage(#[source] KvError),
}

impl From<LedgerError> for CoordinatorError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => CoordinatorError::NotFound(id),
            LedgerError::InvalidTransition { from, to } => {
                CoordinatorError::InvalidTransition { from, to }
            }
            LedgerError::Storage(e) => CoordinatorError::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_error_display() {
        let err = SlotError::Storage(KvError::Unavailable("connection refused".to_string()));
        assert!(err.to_string().contains("slot storage failure"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = LedgerError::InvalidTransition {
            from: OrderStatus::Captured,
            to: OrderStatus::Voided,
        };
        assert_eq!(
            err.to_string(),
            "invalid status transition from captured to voided"
        );
    }

    #[test]
    fn test_coordinator_error_from_ledger_error() {
        let id = OrderId::from_string("ord_x");
        let err: CoordinatorError = LedgerError::NotFound(id.clone()).into();
        assert_eq!(err, CoordinatorError::NotFound(id));
    }
}
