//! Server Configuration
//!
//! Everything comes from the environment (after `.env` is loaded).

use stars_payments::{PaymentError, Result};

const DEFAULT_FRONTEND_URL: &str = "https://your-site.netlify.app";
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Bot API token (`BOT_TOKEN`, required)
    pub bot_token: String,

    /// Frontend origin (`FRONTEND_URL`), logged only
    pub frontend_url: String,

    /// Interface to bind (`BIND_HOST`)
    pub bind_host: String,

    /// Listening port (`PORT`)
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("BOT_TOKEN not set".into()))?;

        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
                PaymentError::Config(format!("PORT must be a port number, got {raw:?}"))
            })?,
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            bot_token,
            frontend_url: lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.into()),
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.into()),
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}
