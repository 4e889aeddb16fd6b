//! Bot configuration: BaseConfig (Telegram, webhook, log) + TransferConfig (storage, inference, conversation TTL).

mod base;
mod bot_config;
mod transfer;


pub use base::{BaseConfig, WebhookConfig};
pub use bot_config::BotConfig;
pub use transfer::TransferConfig;
