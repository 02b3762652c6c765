//! ProcessNotificationHandler - dispatch logic for the provider callback.
//!
//! One endpoint serves three flows: the provider's background result call,
//! the customer's browser arriving back after a successful payment, and the
//! browser arriving back after a failed or cancelled one. The `action`
//! discriminator picks the flow; the background flow additionally routes on
//! the `method` field inside the signed parameter envelope.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::payment::form::OutboundFormBuilder;
use crate::domain::payment::reconciler::{NotificationOutcome, OrderReconciler};
use crate::domain::payment::signature::{self, ParamMap};
use crate::domain::payment::NotificationError;
use crate::ports::{CartSession, OrderStore, OrderStoreError};

/// Behavioural switches for the notification flows, drawn from gateway
/// configuration at startup.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub secret_key: String,
    /// Empty the customer's cart on the success redirect.
    pub cart_clearing: bool,
    /// Mark the order failed when the browser comes back via `action=fail`.
    pub fail_set_order_status_failed: bool,
    /// Attach an order note on the success redirect.
    pub success_order_note: bool,
    /// Attach an order note on the fail redirect.
    pub fail_order_note: bool,
    /// Attach an order note when the customer is sent off to the provider.
    pub payment_process_note: bool,
}

/// One parsed callback request, transport already stripped away.
#[derive(Debug, Clone, Default)]
pub struct CallbackRequest {
    /// Flow discriminator: `success`, `fail`, `redirect`, or absent for the
    /// background result call.
    pub action: Option<String>,
    /// Order reference from `account` or `order_id`.
    pub account: Option<String>,
    /// Background method: `check`, `pay`, or `error`.
    pub method: Option<String>,
    /// The signed `params[...]` envelope.
    pub params: ParamMap,
}

/// JSON reply for the background flow.
///
/// The provider reads `{"result":{"message":…}}` as success and
/// `{"error":{"message":…}}` as failure; the externally tagged enum gives
/// exactly that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationReply {
    Result { message: String },
    Error { message: String },
}

impl NotificationReply {
    pub fn from_outcome(outcome: NotificationOutcome) -> Self {
        match outcome {
            NotificationOutcome::Accepted(message) => NotificationReply::Result { message },
            NotificationOutcome::Rejected(error) => NotificationReply::Error {
                message: error.to_string(),
            },
        }
    }

    pub fn error(error: &NotificationError) -> Self {
        NotificationReply::Error {
            message: error.to_string(),
        }
    }
}

/// What the HTTP layer should send back.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackResponse {
    /// JSON body for the background flow, always HTTP 200.
    Notification(NotificationReply),
    /// Browser redirect to the given URL.
    Redirect(String),
    /// Full HTML page (the auto-submitting payment form).
    PaymentPage(String),
    /// Unrecognised `action`: terminal HTTP 503.
    ActionNotFound,
    /// The order store failed mid-flow; always
    /// [`NotificationError::StoreUnavailable`], whose status code tells the
    /// provider to retry.
    StoreFailure(NotificationError),
}

/// Handler for the unified provider callback endpoint.
pub struct ProcessNotificationHandler {
    settings: NotificationSettings,
    store: Arc<dyn OrderStore>,
    cart: Arc<dyn CartSession>,
    reconciler: OrderReconciler,
    form: OutboundFormBuilder,
}

impl ProcessNotificationHandler {
    pub fn new(
        settings: NotificationSettings,
        store: Arc<dyn OrderStore>,
        cart: Arc<dyn CartSession>,
        form: OutboundFormBuilder,
    ) -> Self {
        let reconciler = OrderReconciler::new(store.clone());
        Self {
            settings,
            store,
            cart,
            reconciler,
            form,
        }
    }

    pub async fn handle(&self, request: CallbackRequest) -> CallbackResponse {
        // 1. Resolve the order. Every flow needs it; a miss is terminal.
        let order = match self.find_order(&request).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!(account = ?request.account, "callback for unknown order");
                return CallbackResponse::Notification(NotificationReply::error(
                    &NotificationError::OrderNotFound,
                ));
            }
            Err(error) => return store_failure(error),
        };

        // 2. Route by action.
        match request.action.as_deref() {
            Some("success") => self.handle_success(&order).await,
            Some("fail") => self.handle_fail(&order).await,
            // Page-skipping checkout: serve a page that immediately POSTs
            // the signed form to the provider.
            Some("redirect") => {
                if self.settings.payment_process_note {
                    self.note(
                        &order.id,
                        "The customer clicked the payment button and was sent to the side of the Unitpay.",
                    )
                    .await;
                }
                let form = self.form.build(&order);
                CallbackResponse::PaymentPage(form.render_auto_submit_page())
            }
            None | Some("") => self.handle_background(&order, &request).await,
            Some(other) => {
                warn!(action = other, order_id = %order.id, "unknown callback action");
                CallbackResponse::ActionNotFound
            }
        }
    }

    async fn find_order(&self, request: &CallbackRequest) -> Result<Option<Order>, OrderStoreError> {
        let account = request
            .account
            .as_deref()
            .or_else(|| request.params.get("account").map(String::as_str))
            .unwrap_or("");
        if account.is_empty() {
            return Ok(None);
        }
        self.store.find_by_id(&OrderId::new(account)).await
    }

    /// Best-effort order note; a store hiccup here never aborts the flow.
    async fn note(&self, order_id: &OrderId, text: &str) {
        if let Err(error) = self.store.add_note(order_id, text).await {
            warn!(%order_id, %error, "could not attach order note");
        }
    }

    /// Browser back from a successful payment. The background `pay` call is
    /// what actually completes the order; this flow only tidies up and sends
    /// the customer on.
    async fn handle_success(&self, order: &Order) -> CallbackResponse {
        if self.settings.cart_clearing {
            if let Err(error) = self.cart.clear_for_order(&order.id).await {
                // Best-effort; the redirect must still happen.
                warn!(order_id = %order.id, %error, "cart clearing failed");
            }
        }
        if self.settings.success_order_note {
            self.note(&order.id, "The client returned to the payment success page.")
                .await;
        }
        debug!(order_id = %order.id, "success redirect");
        CallbackResponse::Redirect(self.store.success_url(order))
    }

    /// Browser back from a failed or cancelled payment.
    async fn handle_fail(&self, order: &Order) -> CallbackResponse {
        if self.settings.fail_order_note {
            self.note(
                &order.id,
                "Order cancellation. The client returned to the payment cancellation page.",
            )
            .await;
        }
        if self.settings.fail_set_order_status_failed {
            if let Err(error) = self.store.update_status(&order.id, OrderStatus::Failed).await {
                return store_failure(error);
            }
        }
        debug!(order_id = %order.id, "fail redirect");
        CallbackResponse::Redirect(self.store.cancel_url(order))
    }

    /// The provider's server-to-server result call.
    ///
    /// Signature verification comes before method routing; on failure the
    /// reconciler is never invoked.
    async fn handle_background(&self, order: &Order, request: &CallbackRequest) -> CallbackResponse {
        let method = request.method.as_deref().unwrap_or("");

        if !signature::verify(&request.params, method, &self.settings.secret_key) {
            warn!(order_id = %order.id, method, "signature verification failed");
            return CallbackResponse::Notification(NotificationReply::error(
                &NotificationError::SignatureInvalid,
            ));
        }

        let outcome = match method {
            "check" => self.reconciler.check(order, &request.params).await,
            "pay" => self.reconciler.pay(order, &request.params).await,
            "error" => self.reconciler.error(order, &request.params).await,
            _ => {
                warn!(order_id = %order.id, method, "unknown notification method");
                return CallbackResponse::Notification(NotificationReply::error(
                    &NotificationError::UnknownMethod,
                ));
            }
        };

        match outcome {
            Ok(outcome) => CallbackResponse::Notification(NotificationReply::from_outcome(outcome)),
            Err(error) => store_failure(error),
        }
    }
}

fn store_failure(error: OrderStoreError) -> CallbackResponse {
    CallbackResponse::StoreFailure(NotificationError::StoreUnavailable(error.to_string()))
}
