//! Payment protocol domain logic.

pub mod errors;
pub mod form;
pub mod receipt;
pub mod reconciler;
pub mod signature;

pub use errors::NotificationError;
pub use form::{FormSettings, OutboundFormBuilder, PaymentForm, ProviderCurrency};
pub use receipt::{
    PaymentMethodCode, PaymentObjectCode, Receipt, ReceiptBuilder, ReceiptItem, TaxCode, TaxSystem,
};
pub use reconciler::{NotificationOutcome, OrderReconciler, MSG_REQUEST_SUCCESS};
pub use signature::ParamMap;
