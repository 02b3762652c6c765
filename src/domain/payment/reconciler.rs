//! Order reconciliation for background notifications.
//!
//! Every background request asserts an amount and currency; the reconciler
//! matches them against the authoritative order before any state change.
//! The provider redelivers `pay` notifications until it gets a success
//! reply, so payment application must be idempotent: an already-completed
//! order re-verifies the amounts and answers success without side effects.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::order::{Order, OrderStatus};
use crate::domain::payment::errors::NotificationError;
use crate::domain::payment::signature::ParamMap;
use crate::ports::{OrderStore, OrderStoreError, PaymentCompletion};

/// Reply the provider reads on success.
pub const MSG_REQUEST_SUCCESS: &str = "Request successfully";

/// Note attached to the order when the provider reports a payment error.
const PAYMENT_ERROR_NOTE: &str = "Payment error";

/// Result of reconciling one notification against one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Answered with `{"result":{"message":…}}`.
    Accepted(String),
    /// Answered with `{"error":{"message":…}}`; no state was changed.
    Rejected(NotificationError),
}

impl NotificationOutcome {
    pub fn accepted() -> Self {
        NotificationOutcome::Accepted(MSG_REQUEST_SUCCESS.to_string())
    }
}

/// Applies check/pay/error outcomes to an order via the [`OrderStore`].
#[derive(Clone)]
pub struct OrderReconciler {
    store: Arc<dyn OrderStore>,
}

impl OrderReconciler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// `check`: pre-payment validation, no state change ever.
    pub async fn check(
        &self,
        order: &Order,
        params: &ParamMap,
    ) -> Result<NotificationOutcome, OrderStoreError> {
        if let Some(rejection) = verify_assertions(order, params) {
            return Ok(NotificationOutcome::Rejected(rejection));
        }
        Ok(NotificationOutcome::accepted())
    }

    /// `pay`: applies the payment at most once.
    ///
    /// A mismatch never mutates; a match completes the order through the
    /// store's atomic transition. `AlreadyCompleted` still answers success
    /// so the provider stops redelivering.
    pub async fn pay(
        &self,
        order: &Order,
        params: &ParamMap,
    ) -> Result<NotificationOutcome, OrderStoreError> {
        if let Some(rejection) = verify_assertions(order, params) {
            warn!(order_id = %order.id, ?rejection, "pay notification rejected");
            return Ok(NotificationOutcome::Rejected(rejection));
        }

        match self.store.complete_payment(&order.id).await? {
            PaymentCompletion::Completed => {
                info!(order_id = %order.id, "payment completed");
            }
            PaymentCompletion::AlreadyCompleted => {
                info!(order_id = %order.id, "duplicate pay notification, order already completed");
            }
        }

        Ok(NotificationOutcome::accepted())
    }

    /// `error`: the provider informs us the payment failed. The order is
    /// marked failed unconditionally and the report is acknowledged
    /// regardless of its prior status.
    pub async fn error(
        &self,
        order: &Order,
        _params: &ParamMap,
    ) -> Result<NotificationOutcome, OrderStoreError> {
        self.store.update_status(&order.id, OrderStatus::Failed).await?;
        self.store.add_note(&order.id, PAYMENT_ERROR_NOTE).await?;
        info!(order_id = %order.id, "order marked failed on provider error report");
        Ok(NotificationOutcome::accepted())
    }
}

/// Matches the asserted `orderSum`/`orderCurrency` against the order.
///
/// Sum is checked before currency, and the rejection says which field
/// mismatched. Amounts compare as decimals after rounding to two places;
/// a missing or unparseable `orderSum` compares as zero, which mirrors the
/// float cast the provider's reference integration performs.
fn verify_assertions(order: &Order, params: &ParamMap) -> Option<NotificationError> {
    let asserted_sum = params
        .get("orderSum")
        .and_then(|raw| Decimal::from_str(raw.trim()).ok())
        .unwrap_or(Decimal::ZERO);

    if order.total.round_dp(2) != asserted_sum.round_dp(2) {
        return Some(NotificationError::AmountMismatch);
    }

    let asserted_currency = params.get("orderCurrency").map(String::as_str).unwrap_or("");
    if order.currency != asserted_currency {
        return Some(NotificationError::CurrencyMismatch);
    }

    None
}
