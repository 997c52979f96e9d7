//! Telegram Integration
//!
//! [`PaymentPlatform`] over the Bot API, plus the long-polling dispatcher
//! that forwards payment updates into the event channels.

use async_trait::async_trait;
use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    types::{LabeledPrice, PreCheckoutQuery},
    RequestError,
};

use crate::error::{PaymentError, Result};
use crate::events::{EventSenders, PreCheckoutEvent, SuccessfulPaymentEvent};
use crate::invoice::InvoiceRequest;
use crate::platform::PaymentPlatform;

/// Bot API client
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(token: &str) -> Self {
        Self { bot: Bot::new(token) }
    }

    /// Underlying teloxide bot
    pub const fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Resolve the bot's username via `getMe`
    pub async fn username(&self) -> Result<String> {
        let me = self.bot.get_me().await?;
        Ok(me.user.username.clone().unwrap_or_default())
    }

    /// Poll for updates and forward payment events until the process stops.
    pub async fn run_dispatcher(self, senders: EventSenders) {
        Dispatcher::builder(self.bot, schema())
            .dependencies(dptree::deps![senders.pre_checkout, senders.successful_payment])
            .default_handler(|update| async move {
                tracing::trace!(update_id = ?update.id, "Ignoring non-payment update");
            })
            .build()
            .dispatch()
            .await;
    }
}

#[async_trait]
impl PaymentPlatform for TelegramPlatform {
    async fn create_invoice_link(&self, invoice: &InvoiceRequest) -> Result<String> {
        let prices: Vec<LabeledPrice> = invoice
            .prices
            .iter()
            .map(|p| LabeledPrice {
                label: p.label.clone(),
                amount: p.amount,
            })
            .collect();

        let mut req = self.bot.create_invoice_link(
            invoice.title.clone(),
            invoice.description.clone(),
            invoice.payload.clone(),
            invoice.currency.clone(),
            prices,
        );
        req.photo_url = invoice.photo_url.parse().ok();
        req.need_name = Some(invoice.need_name);
        req.need_phone_number = Some(invoice.need_phone_number);
        req.need_email = Some(invoice.need_email);
        req.need_shipping_address = Some(invoice.need_shipping_address);
        req.is_flexible = Some(invoice.is_flexible);

        req.await
            .map_err(|e| PaymentError::InvoiceCreation(e.to_string()))
    }

    async fn answer_pre_checkout_query(&self, query_id: &str, ok: bool) -> Result<()> {
        self.bot
            .answer_pre_checkout_query(query_id.to_owned(), ok)
            .await?;
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text.to_owned()).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "Telegram"
    }
}

impl PreCheckoutEvent {
    pub fn from_query(query: &PreCheckoutQuery) -> Self {
        Self {
            query_id: query.id.to_string(),
            payer_id: ChatId::from(query.from.id).0,
            currency: query.currency.to_string(),
            total_amount: query.total_amount,
            invoice_payload: query.invoice_payload.clone(),
        }
    }
}

impl SuccessfulPaymentEvent {
    /// `None` unless the message carries a successful payment.
    ///
    /// The payer is the message sender; the chat is used only when the
    /// sender is missing.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let payment = msg.successful_payment()?;
        let payer = msg
            .from
            .as_ref()
            .map_or(msg.chat.id, |user| ChatId::from(user.id));
        Some(Self {
            payer_id: payer.0,
            telegram_payment_charge_id: payment.telegram_payment_charge_id.to_string(),
            provider_payment_charge_id: payment.provider_payment_charge_id.to_string(),
            currency: payment.currency.to_string(),
            total_amount: payment.total_amount,
            invoice_payload: payment.invoice_payload.clone(),
        })
    }
}

/// Update routing: pre-checkout queries and successful-payment messages.
fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(Update::filter_pre_checkout_query().endpoint(forward_pre_checkout))
        .branch(
            Update::filter_message()
                .filter_map(|msg: Message| SuccessfulPaymentEvent::from_message(&msg))
                .endpoint(forward_successful_payment),
        )
}

async fn forward_pre_checkout(
    query: PreCheckoutQuery,
    events: tokio::sync::mpsc::Sender<PreCheckoutEvent>,
) -> ResponseResult<()> {
    let event = PreCheckoutEvent::from_query(&query);
    if events.send(event).await.is_err() {
        tracing::error!(query_id = %query.id, "Pre-checkout worker is gone, query dropped");
    }
    Ok(())
}

async fn forward_successful_payment(
    event: SuccessfulPaymentEvent,
    events: tokio::sync::mpsc::Sender<SuccessfulPaymentEvent>,
) -> ResponseResult<()> {
    let payer_id = event.payer_id;
    if events.send(event).await.is_err() {
        tracing::error!(user_id = payer_id, "Payment worker is gone, event dropped");
    }
    Ok(())
}
