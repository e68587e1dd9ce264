//! Reservation-payment coordinator
//!
//! Composes the slot registry, the order ledger, and the payment
//! orchestrator into cross-entity operations. No cross-key
//! transactions exist, so each operation drives its sub-operations in
//! a fixed order chosen to keep invariants intact under partial
//! failure, with compensating actions where a later step can fail
//! after an earlier one committed. Dependencies are injected at
//! construction; the coordinator holds no mutable state of its own and
//! is shared across stateless requests.

use crate::ledger::OrderLedger;
use crate::paypal::{CaptureOutcome, PaymentOrchestrator, VoidOutcome};
use crate::slots::{ReserveOutcome, SlotRegistry};
use types::errors::{CoordinatorError, SlotError};
use types::ids::OrderId;
use types::order::{Order, OrderDraft, OrderStatus};

pub struct Coordinator {
    slots: SlotRegistry,
    ledger: OrderLedger,
    payments: PaymentOrchestrator,
}

impl Coordinator {
    pub fn new(slots: SlotRegistry, ledger: OrderLedger, payments: PaymentOrchestrator) -> Self {
        Self {
            slots,
            ledger,
            payments,
        }
    }

    /// Slot registry, for the plain availability operations
    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    /// Order ledger, for plain lookups and listings
    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    /// Reserve the slot, then record the order.
    ///
    /// Reservation goes first: if it reports the slot taken (or loses
    /// the CAS race through its whole retry budget) nothing has been
    /// mutated and the operation aborts with no order created. If the
    /// order write fails after a successful reservation, the slot is
    /// freed as compensation; if that free also fails the slot is
    /// stuck and the failure is surfaced for manual admin follow-up.
    pub async fn place_order(&self, draft: OrderDraft) -> Result<Order, CoordinatorError> {
        let index = draft.slot_index;
        match self.slots.try_reserve(index).await {
            Ok(ReserveOutcome::Reserved(_)) => {}
            Ok(ReserveOutcome::Taken(_)) | Err(SlotError::Contended) => {
                return Err(CoordinatorError::SlotTaken(index));
            }
            Err(SlotError::Storage(e)) => return Err(CoordinatorError::Storage(e)),
        }

        match self.ledger.append(draft).await {
            Ok(order) => Ok(order),
            Err(append_err) => {
                tracing::warn!(slot = %index, error = %append_err, "order write failed, freeing reserved slot");
                match self.slots.free(index).await {
                    Ok(_) => Err(append_err.into()),
                    Err(free_err) => {
                        tracing::error!(
                            slot = %index,
                            error = %free_err,
                            "compensating free failed: slot stuck reserved, manual intervention required"
                        );
                        Err(CoordinatorError::PartialFailure { slot: index })
                    }
                }
            }
        }
    }

    /// Capture the order's payment, then mark it captured.
    ///
    /// A locally captured order short-circuits to success without a
    /// second remote call. When the remote capture succeeds but the
    /// local status write fails, money has been collected while the
    /// ledger still says `authorized`; that divergence is surfaced as
    /// `ReconciliationRequired` and never retried silently.
    pub async fn capture_order(&self, id: &OrderId) -> Result<Order, CoordinatorError> {
        let order = self.ledger.find(id).await?;
        if order.status == OrderStatus::Voided {
            return Err(CoordinatorError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Captured,
            });
        }

        match self.payments.capture(&order).await? {
            CaptureOutcome::AlreadyCaptured => Ok(order),
            CaptureOutcome::Captured(_) => {
                match self.ledger.update_status(id, OrderStatus::Captured).await {
                    Ok(updated) => Ok(updated),
                    Err(write_err) => {
                        tracing::error!(
                            id = %id,
                            error = %write_err,
                            "remote capture succeeded but local status write failed: reconciliation required"
                        );
                        Err(CoordinatorError::ReconciliationRequired { id: id.clone() })
                    }
                }
            }
        }
    }

    /// Void the order's payment, free its slot, then mark it voided.
    ///
    /// The slot is freed only after the remote void succeeds, and the
    /// status write happens last: a crash between free and status
    /// update leaves an `authorized` order whose slot is already free,
    /// which re-running void converges (the remote leg short-circuits,
    /// the free is idempotent). An already-voided order still re-frees
    /// its slot for the same reason.
    pub async fn void_order(&self, id: &OrderId) -> Result<Order, CoordinatorError> {
        let order = self.ledger.find(id).await?;
        if order.status == OrderStatus::Captured {
            return Err(CoordinatorError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Voided,
            });
        }

        let outcome = self.payments.void(&order).await?;

        self.slots
            .free(order.slot_index)
            .await
            .map_err(slot_storage_error)?;

        match outcome {
            VoidOutcome::AlreadyVoided => Ok(order),
            VoidOutcome::Voided => {
                let updated = self.ledger.update_status(id, OrderStatus::Voided).await?;
                Ok(updated)
            }
        }
    }

    /// Admin direct status override.
    ///
    /// Goes through the guarded state machine rather than writing the
    /// raw string, and performs the compensating slot action a bare
    /// status write would skip: overriding to `voided` frees the
    /// order's slot. No remote call is made; the capture/void flows
    /// exist for that.
    pub async fn override_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CoordinatorError> {
        let updated = self.ledger.update_status(id, status).await?;
        if status == OrderStatus::Voided {
            self.slots
                .free(updated.slot_index)
                .await
                .map_err(slot_storage_error)?;
        }
        Ok(updated)
    }
}

fn slot_storage_error(err: SlotError) -> CoordinatorError {
    match err {
        SlotError::Storage(e) => CoordinatorError::Storage(e),
        SlotError::Contended => {
            CoordinatorError::Storage(types::errors::KvError::Conflict)
        }
    }
}
