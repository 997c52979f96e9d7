//! Payment Event Handling
//!
//! Each event kind arrives on its own channel. A worker drains the channel
//! and handles every event in its own task; the handlers are stateless and
//! never retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc, task::JoinSet};

use crate::platform::PaymentPlatform;

/// Text sent to the payer once the payment is captured
pub const CONFIRMATION_TEXT: &str = "🎉 Спасибо за покупку! Ваш цифровой товар активирован.";

/// Capacity of each event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A buyer pressed "Pay" and Telegram wants a go/no-go
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCheckoutEvent {
    pub query_id: String,
    pub payer_id: i64,
    pub currency: String,
    pub total_amount: u32,
    pub invoice_payload: String,
}

/// Telegram captured the payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessfulPaymentEvent {
    pub payer_id: i64,
    pub telegram_payment_charge_id: String,
    pub provider_payment_charge_id: String,
    pub currency: String,
    pub total_amount: u32,
    pub invoice_payload: String,
}

/// What happened to a handled event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The platform accepted our reply
    Acknowledged,
    /// The reply failed and was dropped
    Failed,
}

/// Senders the bot runtime pushes events into
#[derive(Clone)]
pub struct EventSenders {
    pub pre_checkout: mpsc::Sender<PreCheckoutEvent>,
    pub successful_payment: mpsc::Sender<SuccessfulPaymentEvent>,
}

/// Receivers consumed by [`run_pre_checkout_worker`] and [`run_payment_worker`]
pub struct EventReceivers {
    pub pre_checkout: mpsc::Receiver<PreCheckoutEvent>,
    pub successful_payment: mpsc::Receiver<SuccessfulPaymentEvent>,
}

/// Create one bounded channel per event kind
pub fn event_channels() -> (EventSenders, EventReceivers) {
    let (pre_tx, pre_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (paid_tx, paid_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    (
        EventSenders {
            pre_checkout: pre_tx,
            successful_payment: paid_tx,
        },
        EventReceivers {
            pre_checkout: pre_rx,
            successful_payment: paid_rx,
        },
    )
}

/// Approve the query unconditionally.
pub async fn handle_pre_checkout(
    platform: &dyn PaymentPlatform,
    event: &PreCheckoutEvent,
) -> HandlerOutcome {
    tracing::info!(
        query_id = %event.query_id,
        payer_id = event.payer_id,
        amount = event.total_amount,
        currency = %event.currency,
        "Pre-checkout query received"
    );

    match platform.answer_pre_checkout_query(&event.query_id, true).await {
        Ok(()) => {
            tracing::info!(query_id = %event.query_id, "✅ Payment approved");
            HandlerOutcome::Acknowledged
        }
        Err(e) => {
            tracing::error!(query_id = %event.query_id, error = %e, "❌ Failed to approve payment");
            HandlerOutcome::Failed
        }
    }
}

/// Log the payment and thank the payer.
pub async fn handle_successful_payment(
    platform: &dyn PaymentPlatform,
    event: &SuccessfulPaymentEvent,
) -> HandlerOutcome {
    tracing::info!(
        user_id = event.payer_id,
        telegram_payment_charge_id = %event.telegram_payment_charge_id,
        amount = event.total_amount,
        currency = %event.currency,
        "✅ Successful payment"
    );

    match platform.send_message(event.payer_id, CONFIRMATION_TEXT).await {
        Ok(()) => HandlerOutcome::Acknowledged,
        Err(e) => {
            tracing::warn!(
                user_id = event.payer_id,
                error = %e,
                "Could not send purchase confirmation"
            );
            HandlerOutcome::Failed
        }
    }
}

/// Handle pre-checkout events until every sender is dropped.
///
/// Returns once all in-flight handlers have finished.
pub async fn run_pre_checkout_worker(
    platform: Arc<dyn PaymentPlatform>,
    mut events: mpsc::Receiver<PreCheckoutEvent>,
) {
    let mut tasks = JoinSet::new();
    while let Some(event) = events.recv().await {
        let platform = Arc::clone(&platform);
        tasks.spawn(async move { handle_pre_checkout(platform.as_ref(), &event).await });
    }
    drain(tasks, "pre-checkout").await;
}

/// Handle successful-payment events until every sender is dropped.
///
/// Returns once all in-flight handlers have finished.
pub async fn run_payment_worker(
    platform: Arc<dyn PaymentPlatform>,
    mut events: mpsc::Receiver<SuccessfulPaymentEvent>,
) {
    let mut tasks = JoinSet::new();
    while let Some(event) = events.recv().await {
        let platform = Arc::clone(&platform);
        tasks.spawn(async move { handle_successful_payment(platform.as_ref(), &event).await });
    }
    drain(tasks, "successful-payment").await;
}

async fn drain(mut tasks: JoinSet<HandlerOutcome>, kind: &str) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(kind, error = %e, "Event handler task panicked");
        }
    }
    tracing::debug!(kind, "Event worker stopped");
}
