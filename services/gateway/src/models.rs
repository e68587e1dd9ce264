use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::order::{Order, OrderStatus};

/// Public reservation request: `reserve` must be true, freeing is an
/// admin-only operation
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveSlotRequest {
    pub slot: Option<i64>,
    #[serde(default)]
    pub reserve: bool,
}

/// Admin availability override
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSlotRequest {
    pub slot: Option<i64>,
    pub free: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub ok: bool,
    pub id: OrderId,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderRequest {
    pub id: Option<OrderId>,
    pub status: Option<OrderStatus>,
}

/// Body for the capture/void actions: the order id in our store
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentActionRequest {
    pub id: Option<OrderId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentActionResponse {
    pub ok: bool,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateOrderResponse {
    pub ok: bool,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub ok: bool,
    pub admin_email_set: bool,
}
