//! Stars Checkout
//!
//! Turns a requester id into a Telegram invoice link for the digital item.

use std::sync::Arc;

use crate::error::{PaymentError, Result};
use crate::invoice::{DigitalProduct, InvoicePayload, InvoiceRequest, RequesterId};
use crate::platform::PaymentPlatform;

/// Invoice link builder bound to one platform client and one product
pub struct StarsCheckout {
    platform: Arc<dyn PaymentPlatform>,
    product: DigitalProduct,
}

impl StarsCheckout {
    pub fn new(platform: Arc<dyn PaymentPlatform>) -> Self {
        Self::with_product(platform, DigitalProduct::default())
    }

    pub fn with_product(platform: Arc<dyn PaymentPlatform>, product: DigitalProduct) -> Self {
        Self { platform, product }
    }

    pub const fn product(&self) -> &DigitalProduct {
        &self.product
    }

    /// Ask the platform for an invoice link.
    ///
    /// Makes exactly one outbound call and never retries; any failure is
    /// logged and returned as [`PaymentError::InvoiceCreation`] (or
    /// [`PaymentError::InvalidPayload`] if the call was never made).
    pub async fn create_invoice_link(
        &self,
        requester: RequesterId,
        product_title: &str,
    ) -> Result<String> {
        let payload = InvoicePayload::new(requester, &self.product);
        let invoice = InvoiceRequest::for_product(&self.product, product_title, &payload)?;

        let link = self
            .platform
            .create_invoice_link(&invoice)
            .await
            .map_err(|e| {
                tracing::error!(
                    platform = self.platform.name(),
                    user_id = %payload.user_id,
                    error = %e,
                    "Failed to create invoice link"
                );
                match e {
                    PaymentError::InvoiceCreation(msg) | PaymentError::Platform(msg) => {
                        PaymentError::InvoiceCreation(msg)
                    }
                    other => PaymentError::InvoiceCreation(other.to_string()),
                }
            })?;

        tracing::info!(user_id = %payload.user_id, product = %payload.product, "Created invoice link");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;

    #[tokio::test]
    async fn test_link_from_platform() {
        let platform = Arc::new(MockPlatform::with_link("https://t.me/invoice/abc123"));
        let checkout = StarsCheckout::new(platform.clone());

        let link = checkout
            .create_invoice_link(RequesterId::from(42), "Цифровой товар за 1 звезду")
            .await
            .unwrap();

        assert_eq!(link, "https://t.me/invoice/abc123");
        let invoices = platform.invoices().await;
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].currency, "XTR");
        assert!(invoices[0].payload.contains(r#""userId":42"#));
    }

    #[tokio::test]
    async fn test_platform_failure_is_invoice_error() {
        let platform = Arc::new(MockPlatform::failing_invoices("Bad Request: currency invalid"));
        let checkout = StarsCheckout::new(platform.clone());

        let err = checkout
            .create_invoice_link(RequesterId::from(1), "Item")
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvoiceCreation(ref m) if m.contains("currency invalid")));
        assert_eq!(platform.invoices().await.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_payload_never_reaches_platform() {
        let platform = Arc::new(MockPlatform::new());
        let checkout = StarsCheckout::new(platform.clone());
        let requester = RequesterId::from_value(serde_json::json!("u".repeat(500))).unwrap();

        let err = checkout.create_invoice_link(requester, "Item").await.unwrap_err();

        assert!(matches!(err, PaymentError::InvalidPayload(_)));
        assert!(platform.invoices().await.is_empty());
    }
}
