//! Payment gateway command handlers.

mod build_payment_form;
mod process_notification;

pub use build_payment_form::{BuildPaymentFormError, BuildPaymentFormHandler, PaymentFormView};
pub use process_notification::{
    CallbackRequest, CallbackResponse, NotificationReply, NotificationSettings,
    ProcessNotificationHandler,
};
