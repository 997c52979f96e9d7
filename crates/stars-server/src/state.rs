//! Application State

use std::sync::Arc;

use stars_payments::{PaymentPlatform, StarsCheckout};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Invoice link builder over the shared platform client
    pub checkout: Arc<StarsCheckout>,
}

impl AppState {
    pub fn new(platform: Arc<dyn PaymentPlatform>) -> Self {
        Self {
            checkout: Arc::new(StarsCheckout::new(platform)),
        }
    }
}
