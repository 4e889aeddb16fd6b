//! Telegram transport: teloxide adapters, the Bot implementation, menu commands and the dispatcher.

mod adapters;
mod bot_adapter;
mod commands;
mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{reply_markup, TelegramBotAdapter};
pub use commands::Command;
pub use runner::{on_callback, route_message, run_dispatcher};
