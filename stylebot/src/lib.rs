//! # stylebot
//!
//! Telegram bot that restyles user photos. Incoming updates run through a [`HandlerChain`]
//! (logging, commands, the `/nst` and `/gan` conversation, fallback); completed photos are queued
//! on the single [`style_worker`] thread and results are delivered back by [`ResultDelivery`].

pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod conversation;
pub mod delivery;
pub mod handlers;
pub mod images;
pub mod messages;
pub mod runner;
pub mod telegram;

pub use chain::HandlerChain;
pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig, TransferConfig, WebhookConfig};
pub use conversation::{ChatSession, ConversationState, ConversationStore};
pub use delivery::{DeliveryStatus, ResultDelivery};
pub use handlers::{CommandHandler, ConversationHandler, FallbackHandler, LoggingHandler};
pub use images::ImageStore;
pub use runner::{run_bot, spawn_expiry_sweeper, StyleBot};
pub use telegram::{TelegramBotAdapter, TelegramMessageWrapper};
