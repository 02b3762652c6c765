//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `UNITPAY` prefix and
//! nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use unitpay_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {}", config.server.socket_addr());
//! ```

mod error;
mod server;
mod unitpay;

pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;
pub use unitpay::{FiscalConfig, UnitpayConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gateway credentials and behaviour
    pub gateway: UnitpayConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when present, then environment variables:
    ///
    /// - `UNITPAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `UNITPAY__GATEWAY__SECRET_KEY=...` -> `gateway.secret_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("UNITPAY").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gateway.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("UNITPAY__GATEWAY__PUBLIC_KEY", "pk-123");
        env::set_var("UNITPAY__GATEWAY__SECRET_KEY", "s3cr3t");
    }

    fn clear_env() {
        env::remove_var("UNITPAY__GATEWAY__PUBLIC_KEY");
        env::remove_var("UNITPAY__GATEWAY__SECRET_KEY");
        env::remove_var("UNITPAY__GATEWAY__LOCALE");
        env::remove_var("UNITPAY__SERVER__PORT");
    }

    #[test]
    fn loads_from_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("load");
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.public_key, "pk-123");
        assert_eq!(config.gateway.locale, "ru");
        assert_eq!(config.gateway.shop_currency, "RUB");
        assert_eq!(config.gateway.base_url, "https://unitpay.ru");
        assert_eq!(config.server.port, 8080);
        assert!(!config.gateway.fiscal.enabled);
    }

    #[test]
    fn custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("UNITPAY__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.expect("load").server.port, 3000);
    }

    #[test]
    fn invalid_locale_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("UNITPAY__GATEWAY__LOCALE", "fr");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("load");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::UnsupportedLocale(_))
        ));
    }
}
