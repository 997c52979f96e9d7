//! Mock Platform
//!
//! Records every outbound call instead of talking to Telegram. Used by the
//! checkout, event and router tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PaymentError, Result};
use crate::invoice::InvoiceRequest;
use crate::platform::PaymentPlatform;

const DEFAULT_LINK: &str = "https://t.me/invoice/mock";

/// In-memory platform that remembers what it was asked to do
#[derive(Default)]
pub struct MockPlatform {
    link: Option<String>,
    invoice_error: Option<String>,
    answer_error: Option<String>,
    send_error: Option<String>,
    invoices: Mutex<Vec<InvoiceRequest>>,
    answers: Mutex<Vec<(String, bool)>>,
    messages: Mutex<Vec<(i64, String)>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `link` from every invoice call
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// Fail every invoice call with `message`
    pub fn failing_invoices(message: impl Into<String>) -> Self {
        Self {
            invoice_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Fail every pre-checkout answer and message send
    pub fn failing_replies(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            answer_error: Some(message.clone()),
            send_error: Some(message),
            ..Self::default()
        }
    }

    pub async fn invoices(&self) -> Vec<InvoiceRequest> {
        self.invoices.lock().await.clone()
    }

    pub async fn answers(&self) -> Vec<(String, bool)> {
        self.answers.lock().await.clone()
    }

    pub async fn messages(&self) -> Vec<(i64, String)> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl PaymentPlatform for MockPlatform {
    async fn create_invoice_link(&self, invoice: &InvoiceRequest) -> Result<String> {
        self.invoices.lock().await.push(invoice.clone());
        if let Some(ref msg) = self.invoice_error {
            return Err(PaymentError::InvoiceCreation(msg.clone()));
        }
        Ok(self.link.clone().unwrap_or_else(|| DEFAULT_LINK.into()))
    }

    async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> Result<()> {
        self.answers.lock().await.push((query_id.to_string(), ok));
        match self.answer_error {
            Some(ref msg) => Err(PaymentError::Platform(msg.clone())),
            None => Ok(()),
        }
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.messages.lock().await.push((chat_id, text.to_string()));
        match self.send_error {
            Some(ref msg) => Err(PaymentError::Platform(msg.clone())),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MockPlatform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let platform = MockPlatform::new();

        platform.answer_pre_checkout_query("q1", true).await.unwrap();
        platform.send_message(7, "hi").await.unwrap();

        assert_eq!(platform.answers().await, vec![("q1".to_string(), true)]);
        assert_eq!(platform.messages().await, vec![(7, "hi".to_string())]);
    }

    #[tokio::test]
    async fn test_failing_replies_still_record() {
        let platform = MockPlatform::failing_replies("Forbidden: bot was blocked by the user");

        assert!(platform.send_message(7, "hi").await.is_err());
        assert_eq!(platform.messages().await.len(), 1);
    }
}
