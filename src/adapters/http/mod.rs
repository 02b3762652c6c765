//! HTTP adapters - the gateway's inbound surface.

pub mod callback;

pub use callback::{callback_routes, CallbackAppState};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Assembles the full application router with request tracing.
pub fn app(state: CallbackAppState) -> Router {
    Router::new()
        .merge(callback_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
