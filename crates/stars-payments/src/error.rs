//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Bot API refused or failed to create the invoice link
    #[error("Invoice creation failed: {0}")]
    InvoiceCreation(String),

    /// Invoice payload violates platform limits
    #[error("Invalid invoice payload: {0}")]
    InvalidPayload(String),

    /// Any other Bot API call failed (answer, send, getMe)
    #[error("Telegram error: {0}")]
    Platform(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    /// Get user-friendly message
    pub const fn user_message(&self) -> &str {
        match self {
            Self::InvoiceCreation(_) | Self::InvalidPayload(_) | Self::Serialization(_) => {
                "Ошибка при создании платежа"
            }
            Self::Config(_) | Self::Platform(_) => "An error occurred processing your request.",
        }
    }
}

impl From<teloxide::RequestError> for PaymentError {
    fn from(err: teloxide::RequestError) -> Self {
        Self::Platform(err.to_string())
    }
}
