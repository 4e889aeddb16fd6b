//! Handlers making up the chain, in order: logging, commands, conversation, fallback.

mod command_handler;
mod conversation_handler;
mod fallback_handler;
mod logging_handler;

pub use command_handler::CommandHandler;
pub use conversation_handler::ConversationHandler;
pub use fallback_handler::FallbackHandler;
pub use logging_handler::LoggingHandler;

use stylebot_core::{Bot, Chat, Keyboard};
use tracing::error;

/// Sends a reply; a failed send is logged and never changes conversation state.
pub(crate) async fn reply(bot: &dyn Bot, chat: &Chat, text: &str) {
    if let Err(e) = bot.send_message(chat, text).await {
        error!(error = %e, chat_id = chat.id, "Failed to send reply");
    }
}

pub(crate) async fn reply_with_keyboard(bot: &dyn Bot, chat: &Chat, text: &str, keyboard: &Keyboard) {
    if let Err(e) = bot.send_keyboard(chat, text, keyboard).await {
        error!(error = %e, chat_id = chat.id, "Failed to send reply with keyboard");
    }
}
