//! Telegram Stars payment backend
//!
//! Axum server exposing `/create-payment` and `/health`, plus a long-polling
//! bot runtime that approves pre-checkout queries and thanks buyers.

mod app;
mod config;
mod handlers;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stars_payments::{
    event_channels, run_payment_worker, run_pre_checkout_worker, PaymentPlatform,
    TelegramPlatform,
};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {e}");
            tracing::error!("  Set BOT_TOKEN in the environment or .env");
            std::process::exit(1);
        }
    };

    // One bot client for the HTTP handlers and the event workers
    let telegram = TelegramPlatform::new(&config.bot_token);
    match telegram.username().await {
        Ok(username) => tracing::info!("✓ Connected to Telegram as @{}", username),
        Err(e) => tracing::warn!("⚠ Telegram getMe failed: {} - payments will fail", e),
    }
    let platform: Arc<dyn PaymentPlatform> = Arc::new(telegram.clone());

    // Payment events: dispatcher → channels → workers
    let (senders, receivers) = event_channels();
    tokio::spawn(run_pre_checkout_worker(
        Arc::clone(&platform),
        receivers.pre_checkout,
    ));
    tokio::spawn(run_payment_worker(
        Arc::clone(&platform),
        receivers.successful_payment,
    ));
    tokio::spawn(telegram.run_dispatcher(senders));
    tracing::info!("✓ Bot polling for payment updates");

    let app = app::router(AppState::new(platform));

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Server running on port {}", config.port);
    tracing::info!("🔗 Frontend: {}", config.frontend_url);
    tracing::info!("  POST /create-payment - Create Stars invoice link");
    tracing::info!("  GET  /health         - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
