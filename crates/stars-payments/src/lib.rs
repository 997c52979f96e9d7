//! # stars-payments
//!
//! Telegram Stars payments for a single digital item.
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐  invoice link  ┌──────────────┐  checkout  ┌────────────┐
//! │  Frontend  │───────────────▶│   Telegram   │───────────▶│   Buyer    │
//! └────────────┘                └──────────────┘            └────────────┘
//!                                  │        │
//!                       pre_checkout   successful_payment
//!                                  ▼        ▼
//!                          ┌──────────────────────────┐
//!                          │ event channels → workers │
//!                          └──────────────────────────┘
//! ```
//!
//! 1. [`StarsCheckout`] builds an [`InvoiceRequest`] (currency `XTR`, one
//!    price line) and asks the [`PaymentPlatform`] for a link.
//! 2. Telegram sends a pre-checkout query, which is always approved.
//! 3. Telegram reports the captured payment and the payer gets a thank-you
//!    message.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stars_payments::{RequesterId, StarsCheckout, TelegramPlatform};
//!
//! let platform = Arc::new(TelegramPlatform::new("123456:ABC"));
//! let checkout = StarsCheckout::new(platform);
//!
//! let link = checkout
//!     .create_invoice_link(RequesterId::from(42), "Цифровой товар за 1 звезду")
//!     .await?;
//! ```

mod checkout;
mod error;
pub mod events;
mod invoice;
mod mock;
mod platform;
mod telegram;

pub use checkout::StarsCheckout;
pub use error::{PaymentError, Result};
pub use events::{
    event_channels, run_payment_worker, run_pre_checkout_worker, EventReceivers, EventSenders,
    PreCheckoutEvent, SuccessfulPaymentEvent,
};
pub use invoice::{
    DigitalProduct, InvoicePayload, InvoiceRequest, PriceLine, RequesterId, STARS_CURRENCY,
};
pub use mock::MockPlatform;
pub use platform::PaymentPlatform;
pub use telegram::TelegramPlatform;
