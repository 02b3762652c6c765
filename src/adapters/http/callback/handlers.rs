//! Axum handlers for the callback and payment-page endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tracing::error;

use crate::application::handlers::payment::{
    BuildPaymentFormError, BuildPaymentFormHandler, CallbackResponse, NotificationReply,
    ProcessNotificationHandler,
};
use crate::domain::order::OrderId;
use crate::domain::payment::NotificationError;

use super::dto::parse_callback_pairs;

/// Shared state for the callback routes.
#[derive(Clone)]
pub struct CallbackAppState {
    pub notifications: Arc<ProcessNotificationHandler>,
    pub payment_form: Arc<BuildPaymentFormHandler>,
}

/// The unified callback endpoint, GET or POST.
///
/// The provider documents GET for the background call but some
/// installations see POST form bodies; both are accepted, with form fields
/// taking precedence over query parameters.
pub async fn handle_callback(
    State(state): State<CallbackAppState>,
    Query(query): Query<Vec<(String, String)>>,
    form: Option<Form<Vec<(String, String)>>>,
) -> Response {
    let mut pairs = query;
    if let Some(Form(body)) = form {
        pairs.extend(body);
    }

    let request = parse_callback_pairs(pairs);
    render(state.notifications.handle(request).await)
}

/// Customer-facing payment page: the signed form, submitted on load.
pub async fn show_payment_page(
    State(state): State<CallbackAppState>,
    Path(order_id): Path<String>,
) -> Response {
    match state.payment_form.handle(&OrderId::new(order_id)).await {
        Ok(view) => Html(view.render_auto_submit_page()).into_response(),
        Err(BuildPaymentFormError::OrderNotFound(id)) => {
            (StatusCode::NOT_FOUND, format!("order {id} not found")).into_response()
        }
        Err(BuildPaymentFormError::StoreUnavailable(reason)) => {
            error!(%reason, "payment page unavailable");
            (StatusCode::INTERNAL_SERVER_ERROR, "order store unavailable").into_response()
        }
    }
}

fn render(response: CallbackResponse) -> Response {
    match response {
        CallbackResponse::Notification(reply) => json_reply(&reply),
        CallbackResponse::Redirect(url) => found_redirect(&url),
        CallbackResponse::PaymentPage(page) => Html(page).into_response(),
        CallbackResponse::ActionNotFound => (
            NotificationError::UnknownAction.status_code(),
            NotificationError::UnknownAction.to_string(),
        )
            .into_response(),
        CallbackResponse::StoreFailure(error) => {
            error!(%error, retryable = error.is_retryable(), "callback aborted on store failure");
            (error.status_code(), "order store unavailable").into_response()
        }
    }
}

/// Always HTTP 200 with an explicit charset; the provider reads the logical
/// result from the JSON body, not the status line.
fn json_reply(reply: &NotificationReply) -> Response {
    let body = serde_json::to_string(reply).unwrap_or_default();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Plain 302, matching what browsers arriving via GET expect.
/// `axum::response::Redirect` only offers 303/307/308.
fn found_redirect(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}
