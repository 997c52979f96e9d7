//! Invoice Construction
//!
//! Builds the `createInvoiceLink` request for the single digital item sold
//! for Telegram Stars. Nothing here touches the network.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PaymentError, Result};

/// Currency code for Telegram Stars
pub const STARS_CURRENCY: &str = "XTR";

/// Bot API limit for invoice payloads, in bytes
pub const MAX_PAYLOAD_BYTES: usize = 128;

/// Identifier of whoever asked for the invoice, as sent by the frontend.
///
/// Kept as raw JSON: the frontend may send a number or a string and the value
/// is echoed back into the payload untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(Value);

impl RequesterId {
    /// Accept a frontend value, treating `null`, `false`, `0` and `""` as absent.
    pub fn from_value(value: Value) -> Option<Self> {
        let present = match &value {
            Value::Null | Value::Bool(false) => false,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Bool(true) | Value::Array(_) | Value::Object(_) => true,
        };
        present.then_some(Self(value))
    }

    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<i64> for RequesterId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl std::fmt::Display for RequesterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// The one product this backend sells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitalProduct {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price_label: String,
    /// Price in stars
    pub price: u32,
    pub photo_url: String,
}

impl Default for DigitalProduct {
    fn default() -> Self {
        Self {
            id: "digital_item_1".into(),
            title: "Цифровой товар за 1 звезду".into(),
            description: "Цифровой товар за 1 Telegram Star".into(),
            price_label: "Цифровой товар".into(),
            price: 1,
            photo_url: "https://img.icons8.com/color/96/000000/star.png".into(),
        }
    }
}

/// Opaque payload echoed back by Telegram in payment events
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub user_id: RequesterId,
    pub product: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
}

impl InvoicePayload {
    pub fn new(user_id: RequesterId, product: &DigitalProduct) -> Self {
        Self {
            user_id,
            product: product.id.clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Compact JSON form, checked against the Bot API size limit
    pub fn encode(&self) -> Result<String> {
        let encoded = serde_json::to_string(self)?;
        if encoded.is_empty() || encoded.len() > MAX_PAYLOAD_BYTES {
            return Err(PaymentError::InvalidPayload(format!(
                "payload is {} bytes, allowed 1-{MAX_PAYLOAD_BYTES}",
                encoded.len()
            )));
        }
        Ok(encoded)
    }
}

/// One line of the price breakdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub label: String,
    pub amount: u32,
}

/// Everything needed for a `createInvoiceLink` call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub title: String,
    pub description: String,
    pub payload: String,
    pub currency: String,
    pub prices: Vec<PriceLine>,
    pub photo_url: String,
    pub need_name: bool,
    pub need_phone_number: bool,
    pub need_email: bool,
    pub need_shipping_address: bool,
    pub is_flexible: bool,
}

impl InvoiceRequest {
    /// Build a Stars invoice for `product`, shown to the buyer as `title`.
    pub fn for_product(
        product: &DigitalProduct,
        title: &str,
        payload: &InvoicePayload,
    ) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            description: product.description.clone(),
            payload: payload.encode()?,
            currency: STARS_CURRENCY.to_string(),
            prices: vec![PriceLine {
                label: product.price_label.clone(),
                amount: product.price,
            }],
            photo_url: product.photo_url.clone(),
            need_name: false,
            need_phone_number: false,
            need_email: false,
            need_shipping_address: false,
            is_flexible: false,
        })
    }
}
