//! Cart session adapters.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::order::OrderId;
use crate::ports::{CartSession, CartSessionError};

/// In-memory cart session, recording which orders had their cart cleared.
#[derive(Default)]
pub struct InMemoryCartSession {
    cleared: Mutex<Vec<OrderId>>,
}

impl InMemoryCartSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleared_orders(&self) -> Vec<OrderId> {
        self.cleared.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl CartSession for InMemoryCartSession {
    async fn clear_for_order(&self, order_id: &OrderId) -> Result<(), CartSessionError> {
        self.cleared
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(order_id.clone());
        Ok(())
    }
}
