//! Fiscal receipt construction for tax-authority reporting (54-FZ).
//!
//! When fiscal mode is enabled the payment form carries a JSON receipt with
//! one line per order item plus a synthetic delivery line. The provider
//! expects integer line sums: fractional amounts are truncated, exactly as
//! the live integration does. Changing that would desynchronize the receipt
//! from what the provider reports to the tax service.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::order::Order;

/// Name of the synthetic shipping line.
const DELIVERY_ITEM_NAME: &str = "Delivery";

/// Taxation system codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSystem {
    Osn,
    Usn,
    UsnIncome,
    UsnIncomeOutcome,
    Envd,
    Esn,
    Patent,
}

impl Default for TaxSystem {
    fn default() -> Self {
        TaxSystem::Usn
    }
}

/// VAT rate codes applied to every receipt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCode {
    None,
    Vat0,
    Vat10,
    Vat20,
    Vat110,
    Vat120,
}

impl Default for TaxCode {
    fn default() -> Self {
        TaxCode::None
    }
}

/// Settlement method indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodCode {
    FullPrepayment,
    Prepayment,
    Advance,
    FullPayment,
    PartialPayment,
    Credit,
    CreditPayment,
}

/// Settlement subject indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentObjectCode {
    Commodity,
    Excise,
    Job,
    Service,
    GamblingBet,
    GamblingPrize,
    Lottery,
    LotteryPrize,
    IntellectualActivity,
    Payment,
    AgentCommission,
    Composite,
    Another,
    PropertyRight,
    #[serde(rename = "non-operating_gain")]
    NonOperatingGain,
    InsurancePremium,
    SalesTax,
    ResortFee,
}

/// One fiscal line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptItem {
    /// Provider limit is 128 characters.
    pub name: String,
    /// Line total truncated to whole currency units.
    pub sum: i64,
    pub quantity: u32,
    pub tax: TaxCode,
    /// Unset codes go on the wire as empty strings, the shape the provider
    /// accepts as "use the merchant-account default".
    #[serde(serialize_with = "empty_when_none")]
    pub payment_method: Option<PaymentMethodCode>,
    #[serde(serialize_with = "empty_when_none")]
    pub payment_object: Option<PaymentObjectCode>,
}

/// Receipt submitted alongside the payment form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub sno: TaxSystem,
    pub items: Vec<ReceiptItem>,
}

/// Builds receipts from the gateway's fiscal settings.
#[derive(Debug, Clone)]
pub struct ReceiptBuilder {
    tax_system: TaxSystem,
    tax: TaxCode,
    payment_method: Option<PaymentMethodCode>,
    payment_object: Option<PaymentObjectCode>,
}

impl ReceiptBuilder {
    pub fn new(
        tax_system: TaxSystem,
        tax: TaxCode,
        payment_method: Option<PaymentMethodCode>,
        payment_object: Option<PaymentObjectCode>,
    ) -> Self {
        Self {
            tax_system,
            tax,
            payment_method,
            payment_object,
        }
    }

    /// Produces one line per order item in iteration order, plus a
    /// `Delivery` line (quantity 1) appended last when the order has a
    /// positive shipping total.
    ///
    /// An order without items yields an empty receipt. That is still a
    /// well-formed payload; whether the provider accepts it is its call.
    pub fn build(&self, order: &Order) -> Receipt {
        let mut items: Vec<ReceiptItem> = order
            .items
            .iter()
            .map(|line| ReceiptItem {
                name: line.name.clone(),
                sum: truncate_to_units(line.total),
                quantity: line.quantity,
                tax: self.tax,
                payment_method: self.payment_method,
                payment_object: self.payment_object,
            })
            .collect();

        if order.shipping_total > Decimal::ZERO {
            items.push(ReceiptItem {
                name: DELIVERY_ITEM_NAME.to_string(),
                sum: truncate_to_units(order.shipping_total),
                quantity: 1,
                tax: self.tax,
                payment_method: self.payment_method,
                payment_object: self.payment_object,
            });
        }

        Receipt {
            sno: self.tax_system,
            items,
        }
    }
}

/// Integer cast the provider contract requires: truncation toward zero, not
/// rounding.
fn truncate_to_units(amount: Decimal) -> i64 {
    amount.trunc().to_i64().unwrap_or(0)
}

fn empty_when_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(code) => code.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}
