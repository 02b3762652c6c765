//! Shopping-cart session port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::order::OrderId;

#[derive(Debug, Clone, Error)]
pub enum CartSessionError {
    #[error("cart session unavailable: {0}")]
    Unavailable(String),
}

/// Customer cart attached to an order's checkout session.
///
/// Clearing is best-effort: a leftover cart after a paid order is a
/// nuisance, not a correctness problem, so callers log failures and move on.
#[async_trait]
pub trait CartSession: Send + Sync {
    async fn clear_for_order(&self, order_id: &OrderId) -> Result<(), CartSessionError>;
}
