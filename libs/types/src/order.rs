//! Order lifecycle types
//!
//! An order is created `authorized` (funds held by the payment
//! processor) and advances exactly once to `captured` or `voided`.
//! Terminal states never transition again.

use crate::ids::{AuthorizationId, OrderId};
use crate::slot::SlotIndex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status state machine
///
/// `authorized -> captured` and `authorized -> voided` are the only
/// legal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Funds held remotely, awaiting capture or void
    Authorized,
    /// Funds collected (terminal)
    Captured,
    /// Hold released (terminal)
    Voided,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Captured | OrderStatus::Voided)
    }

    /// Check if a transition to `target` is legal from this status
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Authorized, OrderStatus::Captured)
                | (OrderStatus::Authorized, OrderStatus::Voided)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Authorized => "authorized",
            OrderStatus::Captured => "captured",
            OrderStatus::Voided => "voided",
        };
        write!(f, "{s}")
    }
}

/// Customer-supplied order fields, as posted by the storefront
///
/// Everything except `slot_index` and `paypal_auth_id` is opaque
/// payload: stored and echoed back to the admin UI, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub slot_index: SlotIndex,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub price_label: String,
    #[serde(default)]
    pub extras: Decimal,
    #[serde(rename = "totalEUR", default)]
    pub total_eur: Decimal,
    #[serde(default)]
    pub paypal_order_id: String,
    /// Reference to the processor-side authorization to capture/void later
    #[serde(default)]
    pub paypal_auth_id: AuthorizationId,
    #[serde(default)]
    pub payer_email: String,
}

/// A booking record, linked to a slot and a remote payment authorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Unix milliseconds
    pub created_at: i64,
    pub status: OrderStatus,
    pub slot_index: SlotIndex,
    pub email: String,
    pub description: String,
    pub package: String,
    pub price_label: String,
    pub extras: Decimal,
    #[serde(rename = "totalEUR")]
    pub total_eur: Decimal,
    pub paypal_order_id: String,
    pub paypal_auth_id: AuthorizationId,
    pub payer_email: String,
}

impl Order {
    /// Create a new authorized order from a draft
    pub fn new(draft: OrderDraft, created_at: i64) -> Self {
        Self {
            id: OrderId::new(),
            created_at,
            status: OrderStatus::Authorized,
            slot_index: draft.slot_index,
            email: draft.email,
            description: draft.description,
            package: draft.package,
            price_label: draft.price_label,
            extras: draft.extras,
            total_eur: draft.total_eur,
            paypal_order_id: draft.paypal_order_id,
            paypal_auth_id: draft.paypal_auth_id,
            payer_email: draft.payer_email,
        }
    }
}
