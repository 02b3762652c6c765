//! Order persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::order::{Order, OrderId, OrderStatus};

/// Failure talking to the order store.
///
/// The store is external; when it is unreachable the caller must assume no
/// mutation happened and answer the provider with a retryable status.
#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

/// Result of an atomic payment-completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCompletion {
    /// The order transitioned to completed.
    Completed,
    /// The order was already completed; nothing was applied.
    AlreadyCompleted,
}

/// The shop's order storage.
///
/// This is the only shared mutable resource in the protocol.
/// `complete_payment` must be a single atomic compare-and-set so that
/// duplicate deliveries of the same `pay` notification, even concurrent
/// ones, apply the payment side effects at most once.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Transitions the order to completed unless it already is.
    async fn complete_payment(&self, id: &OrderId) -> Result<PaymentCompletion, OrderStoreError>;

    async fn update_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<(), OrderStoreError>;

    /// Appends a human-readable note to the order's history.
    async fn add_note(&self, id: &OrderId, note: &str) -> Result<(), OrderStoreError>;

    /// Where the browser lands after a successful payment.
    fn success_url(&self, order: &Order) -> String;

    /// Where the browser lands after a cancelled or failed payment.
    fn cancel_url(&self, order: &Order) -> String;
}
