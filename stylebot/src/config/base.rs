//! Base config: Telegram Bot connection, webhook listener, logging. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Reads and parses `name`; unset means `default`, set but unparsable is an error.
pub(super) fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

/// Webhook listener settings. Present only when `WEBHOOK_URL` is set.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// WEBHOOK_URL: public https URL Telegram posts updates to; its path is the route served locally.
    pub url: String,
    /// WEBAPP_HOST
    pub host: String,
    /// WEBAPP_PORT
    pub port: u16,
}

impl WebhookConfig {
    /// Local address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("WEBAPP_HOST/WEBAPP_PORT is not a socket address: {}", addr))
    }
}

/// Base config: Telegram-related, webhook, logging.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// None means long polling.
    pub webhook: Option<WebhookConfig>,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/stylebot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let webhook = match env::var("WEBHOOK_URL").ok().filter(|s| !s.trim().is_empty()) {
            Some(url) => Some(WebhookConfig {
                url,
                host: env::var("WEBAPP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("WEBAPP_PORT", 8080)?,
            }),
            None => None,
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            webhook,
        })
    }

    /// Validate config (URLs must parse, webhook bind address must be valid).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if let Some(ref webhook) = self.webhook {
            if reqwest::Url::parse(&webhook.url).is_err() {
                anyhow::bail!("WEBHOOK_URL is set but not a valid URL: {}", webhook.url);
            }
            webhook.socket_addr()?;
        }
        Ok(())
    }
}
