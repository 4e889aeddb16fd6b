//! `/help` (any state) and `/start` (Idle only).

use std::sync::Arc;

use async_trait::async_trait;
use stylebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::reply_with_keyboard;
use crate::conversation::ConversationStore;
use crate::messages;

pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: Arc<ConversationStore>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, store: Arc<ConversationStore>) -> Self {
        Self { bot, store }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = match message.command() {
            Some("help") => messages::HELP,
            // Outside Idle, /start is ordinary input for the conversation.
            Some("start") if self.store.get(message.chat.id).is_idle() => messages::START,
            _ => return Ok(HandlerResponse::Continue),
        };
        info!(command = ?message.command(), "Command handled");
        reply_with_keyboard(
            self.bot.as_ref(),
            &message.chat,
            text,
            &messages::commands_keyboard(),
        )
        .await;
        Ok(HandlerResponse::Stop)
    }
}
