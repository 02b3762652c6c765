//! Error taxonomy for notification processing.
//!
//! Everything the provider can be told about goes on the wire as a JSON
//! error envelope with HTTP 200; the status code only deviates for the
//! terminal unknown-action case and for store outages. No variant is ever
//! allowed to escape as a panic across the HTTP boundary.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced while processing an inbound notification.
///
/// Display strings are part of the provider wire contract and must not be
/// reworded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// Signature missing or did not verify. Checked before anything else.
    #[error("Wrong signature")]
    SignatureInvalid,

    /// The `account` parameter did not resolve to an order.
    #[error("Order not found")]
    OrderNotFound,

    /// Asserted `orderSum` does not match the order total.
    #[error("Wrong order sum")]
    AmountMismatch,

    /// Asserted `orderCurrency` does not match the order currency.
    #[error("Wrong order currency")]
    CurrencyMismatch,

    /// Signature verified but `method` is not check/pay/error.
    #[error("Wrong method")]
    UnknownMethod,

    /// The `action` discriminator matched no known flow.
    #[error("Api request error. Action not found.")]
    UnknownAction,

    /// The order store could not be reached; nothing was mutated.
    #[error("Order store unavailable: {0}")]
    StoreUnavailable(String),
}

impl NotificationError {
    /// HTTP status for this error.
    ///
    /// The provider treats HTTP 200 as "reply delivered" and reads the JSON
    /// body for the logical result, so most errors are 200. 5xx makes the
    /// provider retry delivery, which is what a store outage needs.
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::SignatureInvalid
            | NotificationError::OrderNotFound
            | NotificationError::AmountMismatch
            | NotificationError::CurrencyMismatch
            | NotificationError::UnknownMethod => StatusCode::OK,

            NotificationError::UnknownAction => StatusCode::SERVICE_UNAVAILABLE,

            NotificationError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the provider should redeliver the notification.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotificationError::StoreUnavailable(_))
    }
}
