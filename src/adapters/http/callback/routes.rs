//! Axum router for the gateway endpoints.
//!
//! - `GET|POST /callback` - unified provider callback (background result,
//!   success redirect, fail redirect, page-skipping redirect)
//! - `GET /pay/:order_id` - customer payment page

use axum::routing::get;
use axum::Router;

use super::handlers::{handle_callback, show_payment_page, CallbackAppState};

pub fn callback_routes() -> Router<CallbackAppState> {
    Router::new()
        .route("/callback", get(handle_callback).post(handle_callback))
        .route("/pay/:order_id", get(show_payment_page))
}
