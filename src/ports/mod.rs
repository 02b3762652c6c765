//! Ports (interfaces) consumed by the application layer.
//!
//! Adapters implement these; the protocol core only sees the traits.

mod cart_session;
mod order_store;

pub use cart_session::{CartSession, CartSessionError};
pub use order_store::{OrderStore, OrderStoreError, PaymentCompletion};
