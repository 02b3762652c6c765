//! In-memory order store.
//!
//! Backs the standalone binary and the integration tests. A production
//! deployment replaces this with an adapter over the shop's real order
//! database; the trait is the only contact surface.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::ports::{OrderStore, OrderStoreError, PaymentCompletion};

pub struct InMemoryOrderStore {
    /// Shop origin used to derive the browser landing URLs.
    shop_base_url: String,
    orders: Mutex<HashMap<OrderId, Order>>,
    notes: Mutex<Vec<(OrderId, String)>>,
}

impl InMemoryOrderStore {
    pub fn new(shop_base_url: impl Into<String>) -> Self {
        Self {
            shop_base_url: shop_base_url.into(),
            orders: Mutex::new(HashMap::new()),
            notes: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, order: Order) {
        self.orders.lock().unwrap_or_else(|e| e.into_inner()).insert(order.id.clone(), order);
    }

    /// Notes recorded so far, oldest first.
    pub fn notes(&self) -> Vec<(OrderId, String)> {
        self.notes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn status_of(&self, id: &OrderId) -> Option<OrderStatus> {
        self.orders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|order| order.status)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        Ok(self
            .orders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned())
    }

    async fn complete_payment(&self, id: &OrderId) -> Result<PaymentCompletion, OrderStoreError> {
        // The whole check-and-set happens under one lock, which is what
        // makes duplicate pay deliveries apply at most once.
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        let order = orders
            .get_mut(id)
            .ok_or_else(|| OrderStoreError::Unavailable(format!("order {id} disappeared")))?;

        if order.status.is_paid() {
            return Ok(PaymentCompletion::AlreadyCompleted);
        }
        order.status = OrderStatus::Completed;
        debug!(order_id = %id, "order completed");
        Ok(PaymentCompletion::Completed)
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), OrderStoreError> {
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(order) = orders.get_mut(id) {
            order.status = status;
        }
        Ok(())
    }

    async fn add_note(&self, id: &OrderId, note: &str) -> Result<(), OrderStoreError> {
        self.notes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id.clone(), note.to_string()));
        Ok(())
    }

    fn success_url(&self, order: &Order) -> String {
        format!("{}/order-received/{}", self.shop_base_url, order.id)
    }

    fn cancel_url(&self, order: &Order) -> String {
        format!("{}/cart?cancel_order={}", self.shop_base_url, order.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::LineItem;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::new(id),
            total: dec!(99.90),
            currency: "RUB".to_string(),
            status: OrderStatus::Pending,
            items: vec![LineItem::new("Thing", dec!(99.90), 1)],
            shipping_total: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn complete_payment_is_a_one_way_transition() {
        let store = InMemoryOrderStore::new("https://shop.example");
        store.insert(order("1"));
        let id = OrderId::new("1");

        assert_eq!(
            store.complete_payment(&id).await.unwrap(),
            PaymentCompletion::Completed
        );
        assert_eq!(
            store.complete_payment(&id).await.unwrap(),
            PaymentCompletion::AlreadyCompleted
        );
        assert_eq!(store.status_of(&id), Some(OrderStatus::Completed));
    }

    #[tokio::test]
    async fn concurrent_completions_apply_once() {
        let store = Arc::new(InMemoryOrderStore::new("https://shop.example"));
        store.insert(order("1"));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.complete_payment(&OrderId::new("1")).await.unwrap()
            }));
        }

        let mut applied = 0;
        for task in tasks {
            if task.await.unwrap() == PaymentCompletion::Completed {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn urls_embed_order_id() {
        let store = InMemoryOrderStore::new("https://shop.example");
        let o = order("42");
        assert_eq!(
            store.success_url(&o),
            "https://shop.example/order-received/42"
        );
        assert_eq!(store.cancel_url(&o), "https://shop.example/cart?cancel_order=42");
    }
}
