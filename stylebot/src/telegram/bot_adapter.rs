//! Wraps teloxide::Bot and implements [`stylebot_core::Bot`]. Production code talks to Telegram; tests substitute another Bot impl.

use std::path::Path;

use async_trait::async_trait;
use stylebot_core::{Bot as CoreBot, BotError, Chat, HandlerError, Keyboard, PhotoRef, Result};
use teloxide::net::Download;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton,
    KeyboardMarkup, ReplyMarkup,
};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Converts a core keyboard to Telegram markup (one row of buttons).
pub fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(buttons) => {
            let row: Vec<InlineKeyboardButton> = buttons
                .iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
                .collect();
            InlineKeyboardMarkup::new(vec![row]).into()
        }
        Keyboard::Commands(commands) => {
            let row: Vec<KeyboardButton> =
                commands.iter().map(|c| KeyboardButton::new(c.clone())).collect();
            KeyboardMarkup::new(vec![row]).into()
        }
    }
}

fn download_error(photo: &PhotoRef, reason: impl ToString) -> BotError {
    HandlerError::Download {
        file_id: photo.file_id.clone(),
        reason: reason.to_string(),
    }
    .into()
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_keyboard(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(reply_markup(keyboard))
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, path: &Path, caption: Option<&str>) -> Result<()> {
        let request = self
            .bot
            .send_photo(ChatId(chat.id), InputFile::file(path.to_path_buf()));
        let request = match caption {
            Some(caption) => request.caption(caption.to_string()),
            None => request,
        };
        request.await.map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn download_photo(&self, photo: &PhotoRef, dest: &Path) -> Result<()> {
        let file = self
            .bot
            .get_file(FileId(photo.file_id.clone()))
            .await
            .map_err(|e| download_error(photo, e))?;
        debug!(file_id = %photo.file_id, telegram_path = %file.path, dest = %dest.display(), "Downloading photo");

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| download_error(photo, e))?;
        dst.flush().await?;
        Ok(())
    }
}
