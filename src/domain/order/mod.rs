//! Order model referenced by the payment protocol.
//!
//! Orders are owned by the surrounding shop; the gateway only reads them and
//! requests status transitions through the [`OrderStore`] port. Nothing in
//! this crate creates or deletes an order.
//!
//! [`OrderStore`]: crate::ports::OrderStore

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque order identifier.
///
/// The provider echoes it back as the `account` parameter, so it is kept as
/// a string regardless of how the shop numbers its orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Shop-side order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Failed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// A completed order must never have payment applied again.
    pub fn is_paid(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

/// A single purchasable line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Line total after discounts, in major units.
    pub total: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, total: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            total,
            quantity,
        }
    }
}

/// Snapshot of an order as read from the [`OrderStore`].
///
/// [`OrderStore`]: crate::ports::OrderStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Grand total in major units, 2 fractional digits.
    pub total: Decimal,
    /// 3-letter currency code.
    pub currency: String,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub shipping_total: Decimal,
}

impl Order {
    /// Total formatted the way the provider expects it: exactly two
    /// fractional digits, dot separator, no grouping.
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(total: Decimal) -> Order {
        Order {
            id: OrderId::new("42"),
            total,
            currency: "RUB".to_string(),
            status: OrderStatus::Pending,
            items: Vec::new(),
            shipping_total: Decimal::ZERO,
        }
    }

    #[test]
    fn formatted_total_pads_to_two_decimals() {
        assert_eq!(order(dec!(1500)).formatted_total(), "1500.00");
        assert_eq!(order(dec!(99.9)).formatted_total(), "99.90");
        assert_eq!(order(dec!(0.01)).formatted_total(), "0.01");
    }

    #[test]
    fn only_completed_counts_as_paid() {
        assert!(OrderStatus::Completed.is_paid());
        assert!(!OrderStatus::Pending.is_paid());
        assert!(!OrderStatus::Processing.is_paid());
        assert!(!OrderStatus::Failed.is_paid());
    }
}
