//! Unitpay gateway configuration

use serde::Deserialize;

use crate::application::handlers::payment::NotificationSettings;
use crate::domain::payment::receipt::{PaymentMethodCode, PaymentObjectCode, TaxCode, TaxSystem};
use crate::domain::payment::{FormSettings, ReceiptBuilder};

use super::error::ValidationError;

/// Gateway credentials and behavioural switches.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitpayConfig {
    /// Public key identifying the shop on the provider's pay page.
    pub public_key: String,

    /// Shared secret for signing and verification.
    pub secret_key: String,

    /// Secret issued for the provider's test cabinet. Loaded alongside the
    /// live one; the callback flows verify against `secret_key` only.
    #[serde(default)]
    pub test_secret_key: Option<String>,

    /// Send outbound forms with the unsigned `test=1` flag.
    #[serde(default)]
    pub test: bool,

    /// Provider UI language, `ru` or `en`.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// ISO currency code the shop prices in.
    #[serde(default = "default_currency")]
    pub shop_currency: String,

    /// Provider origin.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fiscal receipt reporting.
    #[serde(default)]
    pub fiscal: FiscalConfig,

    /// Empty the customer's cart on the success redirect.
    #[serde(default)]
    pub cart_clearing: bool,

    /// Mark the order failed when the browser returns via `action=fail`.
    #[serde(default)]
    pub fail_set_order_status_failed: bool,

    /// Attach order notes on the browser redirects.
    #[serde(default = "default_true")]
    pub order_notes: bool,
}

/// Fiscal receipt settings, all snake_case provider codes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiscalConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub tax_system: TaxSystem,

    #[serde(default)]
    pub vat: TaxCode,

    #[serde(default)]
    pub payment_method: Option<PaymentMethodCode>,

    #[serde(default)]
    pub payment_object: Option<PaymentObjectCode>,
}

fn default_locale() -> String {
    "ru".to_string()
}

fn default_currency() -> String {
    "RUB".to_string()
}

fn default_base_url() -> String {
    "https://unitpay.ru".to_string()
}

fn default_true() -> bool {
    true
}

impl UnitpayConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.public_key.is_empty() {
            return Err(ValidationError::MissingRequired("UNITPAY_PUBLIC_KEY"));
        }
        if self.secret_key.is_empty() {
            return Err(ValidationError::MissingRequired("UNITPAY_SECRET_KEY"));
        }
        if self.locale != "ru" && self.locale != "en" {
            return Err(ValidationError::UnsupportedLocale(self.locale.clone()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }

    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            public_key: self.public_key.clone(),
            secret_key: self.secret_key.clone(),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            shop_currency: self.shop_currency.clone(),
            locale: self.locale.clone(),
            test_mode: self.test,
        }
    }

    /// `Some` only when fiscal reporting is switched on.
    pub fn receipt_builder(&self) -> Option<ReceiptBuilder> {
        if !self.fiscal.enabled {
            return None;
        }
        Some(ReceiptBuilder::new(
            self.fiscal.tax_system,
            self.fiscal.vat,
            self.fiscal.payment_method,
            self.fiscal.payment_object,
        ))
    }

    pub fn notification_settings(&self) -> NotificationSettings {
        NotificationSettings {
            secret_key: self.secret_key.clone(),
            cart_clearing: self.cart_clearing,
            fail_set_order_status_failed: self.fail_set_order_status_failed,
            success_order_note: self.order_notes,
            fail_order_note: self.order_notes,
            payment_process_note: self.order_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UnitpayConfig {
        UnitpayConfig {
            public_key: "pk-123".to_string(),
            secret_key: "s3cr3t".to_string(),
            test_secret_key: None,
            test: false,
            locale: default_locale(),
            shop_currency: default_currency(),
            base_url: default_base_url(),
            fiscal: FiscalConfig::default(),
            cart_clearing: false,
            fail_set_order_status_failed: false,
            order_notes: true,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut c = config();
        c.public_key.clear();
        assert_eq!(
            c.validate(),
            Err(ValidationError::MissingRequired("UNITPAY_PUBLIC_KEY"))
        );

        let mut c = config();
        c.secret_key.clear();
        assert_eq!(
            c.validate(),
            Err(ValidationError::MissingRequired("UNITPAY_SECRET_KEY"))
        );
    }

    #[test]
    fn only_ru_and_en_locales_are_supported() {
        let mut c = config();
        c.locale = "de".to_string();
        assert!(matches!(
            c.validate(),
            Err(ValidationError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn base_url_must_be_http() {
        let mut c = config();
        c.base_url = "unitpay.ru".to_string();
        assert!(matches!(c.validate(), Err(ValidationError::InvalidBaseUrl(_))));
    }

    #[test]
    fn form_settings_strip_trailing_slash() {
        let mut c = config();
        c.base_url = "https://unitpay.ru/".to_string();
        assert_eq!(c.form_settings().base_url, "https://unitpay.ru");
    }

    #[test]
    fn receipt_builder_requires_fiscal_enabled() {
        assert!(config().receipt_builder().is_none());

        let mut c = config();
        c.fiscal.enabled = true;
        assert!(c.receipt_builder().is_some());
    }

    #[test]
    fn fiscal_codes_deserialize_from_provider_names() {
        let fiscal: FiscalConfig = serde_json::from_str(
            r#"{
                "enabled": true,
                "tax_system": "usn_income",
                "vat": "vat20",
                "payment_method": "full_payment",
                "payment_object": "commodity"
            }"#,
        )
        .unwrap();

        assert!(fiscal.enabled);
        assert_eq!(fiscal.tax_system, TaxSystem::UsnIncome);
        assert_eq!(fiscal.vat, TaxCode::Vat20);
        assert_eq!(fiscal.payment_method, Some(PaymentMethodCode::FullPayment));
        assert_eq!(fiscal.payment_object, Some(PaymentObjectCode::Commodity));
    }
}
