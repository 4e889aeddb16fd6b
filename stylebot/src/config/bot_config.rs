//! BotConfig: BaseConfig + TransferConfig. Use load() for env-based loading.

use anyhow::Result;

use super::{BaseConfig, TransferConfig};

/// Bot config. Call validate() after load() to fail fast before init.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub transfer: TransferConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let transfer = TransferConfig::from_env()?;
        Ok(Self { base, transfer })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.transfer.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn transfer(&self) -> &TransferConfig {
        &self.transfer
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
