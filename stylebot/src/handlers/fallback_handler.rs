use std::sync::Arc;

use async_trait::async_trait;
use stylebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::reply_with_keyboard;
use crate::messages;

/// Last in the chain: anything nobody handled (unknown command, stray text or photo, stale
/// button press) gets the "didn't understand" reply with the command keyboard.
pub struct FallbackHandler {
    bot: Arc<dyn Bot>,
}

impl FallbackHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for FallbackHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(kind = message.kind_name(), "Unhandled input");
        reply_with_keyboard(
            self.bot.as_ref(),
            &message.chat,
            messages::CONFUSED,
            &messages::commands_keyboard(),
        )
        .await;
        Ok(HandlerResponse::Stop)
    }
}
