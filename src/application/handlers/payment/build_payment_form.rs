//! BuildPaymentFormHandler - produces the signed provider form for an order.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::order::OrderId;
use crate::domain::payment::form::{OutboundFormBuilder, PaymentForm};
use crate::ports::OrderStore;

#[derive(Debug, Clone, Error)]
pub enum BuildPaymentFormError {
    /// Rendering a form for a nonexistent order is fatal to the request.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Signed form plus the cancel link the checkout page renders next to it.
#[derive(Debug, Clone)]
pub struct PaymentFormView {
    pub form: PaymentForm,
    pub cancel_url: String,
}

impl PaymentFormView {
    pub fn render(&self) -> String {
        self.form.render(&self.cancel_url)
    }

    pub fn render_auto_submit_page(&self) -> String {
        self.form.render_auto_submit_page()
    }
}

pub struct BuildPaymentFormHandler {
    store: Arc<dyn OrderStore>,
    builder: OutboundFormBuilder,
    /// Record an order note when the customer starts the payment process.
    payment_process_note: bool,
}

impl BuildPaymentFormHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        builder: OutboundFormBuilder,
        payment_process_note: bool,
    ) -> Self {
        Self {
            store,
            builder,
            payment_process_note,
        }
    }

    pub async fn handle(&self, order_id: &OrderId) -> Result<PaymentFormView, BuildPaymentFormError> {
        let order = self
            .store
            .find_by_id(order_id)
            .await
            .map_err(|e| BuildPaymentFormError::StoreUnavailable(e.to_string()))?
            .ok_or_else(|| BuildPaymentFormError::OrderNotFound(order_id.clone()))?;

        if self.payment_process_note {
            // Best-effort; the form must render even if the note fails.
            if let Err(error) = self
                .store
                .add_note(
                    &order.id,
                    "The customer clicked the payment button and was sent to the page of the received order.",
                )
                .await
            {
                warn!(order_id = %order.id, %error, "could not attach payment-process note");
            }
        }

        debug!(order_id = %order.id, total = %order.formatted_total(), "building payment form");
        let cancel_url = self.store.cancel_url(&order);
        Ok(PaymentFormView {
            form: self.builder.build(&order),
            cancel_url,
        })
    }
}
