//! Order ledger
//!
//! Owns the append-style order collection, persisted as one JSON array
//! most-recent-first. Appends and status updates run the same
//! conditional-write loop as the slot registry so concurrent writers
//! cannot silently drop each other's records. Status changes are
//! checked against the state machine on the freshly read record, so
//! the loser of a simultaneous capture/void race gets
//! `InvalidTransition` instead of overwriting a terminal state.

use crate::store::{backoff, KvStore, Revision, CAS_ATTEMPTS};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use types::errors::{KvError, LedgerError};
use types::ids::OrderId;
use types::order::{Order, OrderDraft, OrderStatus};

/// Blob key holding the order collection
pub const ORDERS_KEY: &str = "commission-orders/orders";

pub struct OrderLedger {
    store: Arc<dyn KvStore>,
}

impl OrderLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append a new authorized order, most-recent-first
    pub async fn append(&self, draft: OrderDraft) -> Result<Order, LedgerError> {
        for attempt in 0..CAS_ATTEMPTS {
            let (mut orders, revision) = self.load().await?;
            let order = Order::new(draft.clone(), now_millis());
            orders.insert(0, order.clone());
            match self.commit(&orders, revision).await {
                Ok(()) => {
                    tracing::info!(id = %order.id, slot = %order.slot_index, "order appended");
                    return Ok(order);
                }
                Err(KvError::Conflict) => backoff(attempt).await,
                Err(e) => return Err(LedgerError::Storage(e)),
            }
        }
        Err(LedgerError::Storage(KvError::Conflict))
    }

    pub async fn find(&self, id: &OrderId) -> Result<Order, LedgerError> {
        let (orders, _) = self.load().await?;
        orders
            .into_iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.clone()))
    }

    /// Advance an order's status through the state machine.
    ///
    /// The transition is validated against the record as freshly read
    /// inside the CAS loop; any attempt from a terminal state or to an
    /// invalid target leaves the record unchanged.
    pub async fn update_status(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, LedgerError> {
        for attempt in 0..CAS_ATTEMPTS {
            let (mut orders, revision) = self.load().await?;
            let order = orders
                .iter_mut()
                .find(|o| &o.id == id)
                .ok_or_else(|| LedgerError::NotFound(id.clone()))?;
            if !order.status.can_transition_to(new_status) {
                return Err(LedgerError::InvalidTransition {
                    from: order.status,
                    to: new_status,
                });
            }
            order.status = new_status;
            let updated = order.clone();
            match self.commit(&orders, revision).await {
                Ok(()) => {
                    tracing::info!(id = %updated.id, status = %updated.status, "order status updated");
                    return Ok(updated);
                }
                Err(KvError::Conflict) => backoff(attempt).await,
                Err(e) => return Err(LedgerError::Storage(e)),
            }
        }
        Err(LedgerError::Storage(KvError::Conflict))
    }

    /// All orders, insertion order, most-recent-first
    pub async fn list(&self) -> Result<Vec<Order>, LedgerError> {
        let (orders, _) = self.load().await?;
        Ok(orders)
    }

    async fn load(&self) -> Result<(Vec<Order>, Option<Revision>), LedgerError> {
        match self
            .store
            .fetch(ORDERS_KEY)
            .await
            .map_err(LedgerError::Storage)?
        {
            Some(versioned) => {
                let orders = serde_json::from_value(versioned.value)
                    .map_err(|e| LedgerError::Storage(KvError::Unavailable(e.to_string())))?;
                Ok((orders, Some(versioned.revision)))
            }
            None => Ok((Vec::new(), None)),
        }
    }

    async fn commit(&self, orders: &[Order], revision: Option<Revision>) -> Result<(), KvError> {
        let value =
            serde_json::to_value(orders).map_err(|e| KvError::Unavailable(e.to_string()))?;
        self.store.put(ORDERS_KEY, value, revision).await?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
