use std::net::SocketAddr;

use thiserror::Error;
use tracing::Level;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),
    #[error("{name} can't be parsed: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where Telegram should deliver updates when running behind a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub log_level: Level,
    pub webhook: Option<Webhook>,
}

impl BotConfig {
    /// Reads `TELOXIDE_TOKEN`, `LOG_LEVEL`, `WEBHOOK_URL` and `WEBHOOK_ADDR`
    /// after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;

        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| "error".into())
            .parse::<Level>()
            .map_err(|e| ConfigError::Invalid {
                name: "LOG_LEVEL",
                reason: e.to_string(),
            })?;

        let url = lookup("WEBHOOK_URL")
            .map(|raw| raw.parse::<Url>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                name: "WEBHOOK_URL",
                reason: e.to_string(),
            })?;
        let addr = lookup("WEBHOOK_ADDR")
            .map(|raw| raw.parse::<SocketAddr>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                name: "WEBHOOK_ADDR",
                reason: e.to_string(),
            })?;

        let webhook = match (url, addr) {
            (Some(url), Some(addr)) => Some(Webhook { url, addr }),
            _ => None,
        };

        Ok(Self {
            token,
            log_level,
            webhook,
        })
    }
}
