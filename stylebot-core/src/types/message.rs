//! Message types for the core model: inbound text, photos and button presses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// Reference to a photo stored on the transport side. `unique_id` is stable across bots and
/// re-uploads; `file_id` is what the transport needs to download it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub file_id: String,
    pub unique_id: String,
}

/// What the inbound event carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Plain text or a command such as `/nst`.
    Text(String),
    /// A photo (largest size), with optional caption.
    Photo {
        photo: PhotoRef,
        caption: Option<String>,
    },
    /// Inline keyboard button press; carries the button's callback data.
    Callback(String),
    /// Stickers, documents, voice and everything else the bot does not read.
    Other,
}

/// A single inbound event with user, chat and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Text body, if this is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Command name without the leading slash and `@botname` suffix, e.g. `"nst"` for `/nst@my_bot now`.
    pub fn command(&self) -> Option<&str> {
        let text = self.text()?.trim_start();
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Bot a command is addressed to: `"my_bot"` for `/nst@my_bot`. None without a mention.
    pub fn command_target(&self) -> Option<&str> {
        let first = self.text()?.split_whitespace().next()?;
        let (_, target) = first.strip_prefix('/')?.split_once('@')?;
        Some(target).filter(|t| !t.is_empty())
    }

    /// False only for a command that names a different bot. Usernames are case-insensitive.
    pub fn is_addressed_to(&self, bot_username: &str) -> bool {
        match self.command_target() {
            Some(target) => target.eq_ignore_ascii_case(bot_username.trim_start_matches('@')),
            None => true,
        }
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        match &self.kind {
            MessageKind::Photo { photo, .. } => Some(photo),
            _ => None,
        }
    }

    pub fn callback_data(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Callback(data) => Some(data.as_str()),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            MessageKind::Text(_) if self.command().is_some() => "command",
            MessageKind::Text(_) => "text",
            MessageKind::Photo { .. } => "photo",
            MessageKind::Callback(_) => "callback",
            MessageKind::Other => "other",
        }
    }
}
