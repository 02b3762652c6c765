//! Standalone gateway server wired to the in-memory adapters.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use unitpay_gateway::adapters::cart::InMemoryCartSession;
use unitpay_gateway::adapters::http::{app, CallbackAppState};
use unitpay_gateway::adapters::order::InMemoryOrderStore;
use unitpay_gateway::application::handlers::payment::{
    BuildPaymentFormHandler, ProcessNotificationHandler,
};
use unitpay_gateway::config::AppConfig;
use unitpay_gateway::domain::payment::OutboundFormBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let store = Arc::new(InMemoryOrderStore::new("https://shop.example"));
    let cart = Arc::new(InMemoryCartSession::new());

    let form_builder =
        OutboundFormBuilder::new(config.gateway.form_settings(), config.gateway.receipt_builder());
    let state = CallbackAppState {
        notifications: Arc::new(ProcessNotificationHandler::new(
            config.gateway.notification_settings(),
            store.clone(),
            cart,
            form_builder.clone(),
        )),
        payment_form: Arc::new(BuildPaymentFormHandler::new(
            store,
            form_builder,
            config.gateway.order_notes,
        )),
    };

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "unitpay gateway listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
