//! Outbound payment form construction.
//!
//! Once per checkout the shop renders an HTML form that POSTs the order to
//! the provider's pay page. The field set, its order, and above all the
//! signed subset are a fixed wire contract: the signature covers only
//! `account`, `currency`, `desc` and `sum` (plus the secret), while `test`,
//! `Receipt` and `locale` travel unsigned. That looks incomplete, but it is
//! what the live provider verifies against; widening the signed set would
//! break every real payment.

use crate::domain::order::Order;
use crate::domain::payment::receipt::ReceiptBuilder;
use crate::domain::payment::signature::digest_joined;

/// Currencies the provider accepts.
///
/// Everything outside this set silently falls back to roubles. The fallback
/// is a known correctness hazard of the protocol (a EUR-priced order in an
/// unsupported shop currency would be charged as RUB) and is preserved for
/// compatibility; tests pin it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCurrency {
    Rub,
    Usd,
    Eur,
    Kzt,
}

impl ProviderCurrency {
    /// Effective currency for one checkout.
    ///
    /// The order's own currency wins when it differs from the configured
    /// shop currency. Resolution is a pure function of its two inputs so
    /// concurrent checkouts in different currencies cannot race.
    pub fn resolve(shop_currency: &str, order_currency: &str) -> Self {
        if order_currency != shop_currency {
            Self::from_code(order_currency)
        } else {
            Self::from_code(shop_currency)
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "USD" => ProviderCurrency::Usd,
            "EUR" => ProviderCurrency::Eur,
            "KZT" => ProviderCurrency::Kzt,
            _ => ProviderCurrency::Rub,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProviderCurrency::Rub => "RUB",
            ProviderCurrency::Usd => "USD",
            ProviderCurrency::Eur => "EUR",
            ProviderCurrency::Kzt => "KZT",
        }
    }
}

/// Gateway settings the form builder needs, threaded in explicitly.
#[derive(Debug, Clone)]
pub struct FormSettings {
    pub public_key: String,
    pub secret_key: String,
    /// Provider origin, e.g. `https://unitpay.ru`.
    pub base_url: String,
    pub shop_currency: String,
    /// Provider UI language, `ru` or `en`.
    pub locale: String,
    pub test_mode: bool,
}

/// A signed, ordered parameter set ready to become an HTML form.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    /// `{base_url}/pay/{public_key}`
    pub action_url: String,
    /// Fields in submission order, values unescaped.
    pub fields: Vec<(String, String)>,
}

impl PaymentForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Hidden inputs plus a submit button, attribute-escaped.
    pub fn render(&self, cancel_url: &str) -> String {
        format!(
            "<form action=\"{}\" method=\"POST\" id=\"unitpay_payment_form\" accept-charset=\"utf-8\">\n{}\
             <input type=\"submit\" class=\"button alt\" id=\"submit_unitpay_payment_form\" value=\"Pay\" /> \
             <a class=\"button cancel\" href=\"{}\">Cancel &amp; return to cart</a>\n</form>",
            escape_attribute(&self.action_url),
            self.render_inputs(),
            escape_attribute(cancel_url),
        )
    }

    /// Minimal page that submits the form as soon as it loads. Used by the
    /// page-skipping checkout flow.
    pub fn render_auto_submit_page(&self) -> String {
        format!(
            "<html lang=\"ru\"><body style=\"display: none;\" \
             onload=\"document.forms.unitpay_payment_form.submit()\">\
             <form action=\"{}\" method=\"POST\" id=\"unitpay_payment_form\" accept-charset=\"utf-8\">\n{}</form>\
             </body></html>",
            escape_attribute(&self.action_url),
            self.render_inputs(),
        )
    }

    fn render_inputs(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "<input type=\"hidden\" name=\"{}\" value=\"{}\" />\n",
                    escape_attribute(key),
                    escape_attribute(value)
                )
            })
            .collect()
    }
}

/// Builds the signed payment form for an order.
#[derive(Debug, Clone)]
pub struct OutboundFormBuilder {
    settings: FormSettings,
    receipt: Option<ReceiptBuilder>,
}

impl OutboundFormBuilder {
    /// `receipt` enables the fiscal payload; `None` leaves it off the form.
    pub fn new(settings: FormSettings, receipt: Option<ReceiptBuilder>) -> Self {
        Self { settings, receipt }
    }

    /// Assembles and signs the form for `order`.
    pub fn build(&self, order: &Order) -> PaymentForm {
        let sum = order.formatted_total();
        let account = order.id.to_string();
        let desc = format!("Order number: {}", order.id);
        let currency =
            ProviderCurrency::resolve(&self.settings.shop_currency, &order.currency).code();

        let mut fields: Vec<(String, String)> = vec![
            ("sum".to_string(), sum.clone()),
            ("account".to_string(), account.clone()),
            ("desc".to_string(), desc.clone()),
            ("currency".to_string(), currency.to_string()),
        ];

        if self.settings.test_mode {
            fields.push(("test".to_string(), "1".to_string()));
        }

        if let Some(receipt_builder) = &self.receipt {
            let receipt = receipt_builder.build(order);
            // serde_json cannot fail on these types; an empty payload is the
            // safe degradation either way.
            let json = serde_json::to_string(&receipt).unwrap_or_default();
            fields.push(("Receipt".to_string(), urlencoding::encode(&json).into_owned()));
        }

        // The signed subset, fixed by the provider contract. Receipt, test
        // and locale are added outside of it.
        let signature = digest_joined([
            account.as_str(),
            currency,
            desc.as_str(),
            sum.as_str(),
            self.settings.secret_key.as_str(),
        ]);
        fields.push(("signature".to_string(), signature));
        fields.push(("locale".to_string(), self.settings.locale.clone()));

        PaymentForm {
            action_url: format!("{}/pay/{}", self.settings.base_url, self.settings.public_key),
            fields,
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
