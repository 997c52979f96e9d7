//! Bot Platform Abstraction
//!
//! The calls this backend makes against the messaging platform. The Telegram
//! implementation lives in [`crate::telegram`], a recording one in
//! [`crate::MockPlatform`].

use async_trait::async_trait;

use crate::error::Result;
use crate::invoice::InvoiceRequest;

/// Outbound bot capability shared by the HTTP layer and the event workers
#[async_trait]
pub trait PaymentPlatform: Send + Sync {
    /// Create a shareable invoice link
    async fn create_invoice_link(&self, invoice: &InvoiceRequest) -> Result<String>;

    /// Accept or reject a pending pre-checkout query
    async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> Result<()>;

    /// Send a plain text message to a chat
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Platform name, for logs
    fn name(&self) -> &str;
}
