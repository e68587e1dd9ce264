use crate::handlers::{self, orders, payments, slots};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/slots", get(slots::get_slots).post(slots::reserve_slot))
        .route(
            "/admin/slots",
            get(slots::admin_get_slots).post(slots::admin_set_slot),
        )
        .route(
            "/orders",
            get(orders::list_orders)
                .post(orders::create_order)
                .put(orders::update_order),
        )
        .route("/pp-capture", post(payments::capture_order))
        .route("/pp-void", post(payments::void_order))
        .route("/ping", get(handlers::ping))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
