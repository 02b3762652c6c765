//! HTTP adapter for the provider callback and payment page.

mod dto;
mod handlers;
mod routes;

pub use handlers::CallbackAppState;
pub use routes::callback_routes;
