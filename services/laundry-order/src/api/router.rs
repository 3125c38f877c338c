//! 路由

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use laundry_auth_core::TokenService;

use super::handlers;
use super::middleware::auth_middleware;
use crate::application::{InquiryHandler, OrderLifecycleHandler, TransactionQueryHandler};

#[derive(Clone)]
pub struct AppState {
    pub inquiry: Arc<InquiryHandler>,
    pub lifecycle: Arc<OrderLifecycleHandler>,
    pub queries: Arc<TransactionQueryHandler>,
    pub token_service: Arc<TokenService>,
}

/// `/api/v1` 下的全部业务路由，均需 Bearer token
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/inquiry", post(handlers::process_inquiry))
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/{id}", get(handlers::get_transaction))
        .route("/transactions/{id}/details", get(handlers::get_transaction_details))
        .route("/transactions/{id}/status", put(handlers::update_transaction_status))
        .route("/transactions/{id}/payment-status", put(handlers::update_payment_status))
        .route("/outlets/{outlet_id}/transactions", get(handlers::list_outlet_transactions))
        .route("/payments/callback", post(handlers::payment_callback))
        .route_layer(from_fn_with_state(state.token_service.clone(), auth_middleware))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}
