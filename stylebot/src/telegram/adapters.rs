//! Adapters from Telegram (teloxide) types to stylebot_core types.
//! Depends only on teloxide and stylebot_core type definitions.

use stylebot_core::{Chat, Message, MessageKind, PhotoRef, ToCoreMessage, ToCoreUser, User};
use teloxide::types::{CallbackQuery, PhotoSize};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn unknown_user() -> User {
    User {
        id: 0,
        username: None,
        first_name: None,
        last_name: None,
    }
}

/// Telegram sends several sizes of the same photo; keep the largest.
fn largest_photo(sizes: &[PhotoSize]) -> Option<PhotoRef> {
    sizes
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
        .map(|p| PhotoRef {
            file_id: p.file.id.0.clone(),
            unique_id: p.file.unique_id.0.clone(),
        })
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    fn kind(&self) -> MessageKind {
        if let Some(photo) = self.0.photo().and_then(largest_photo) {
            return MessageKind::Photo {
                photo,
                caption: self.0.caption().map(|s| s.to_string()),
            };
        }
        match self.0.text() {
            Some(text) => MessageKind::Text(text.to_string()),
            None => MessageKind::Other,
        }
    }
}

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(unknown_user),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: if self.0.chat.is_private() {
                    "private".to_string()
                } else {
                    "group".to_string()
                },
            },
            kind: self.kind(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Wraps a teloxide CallbackQuery (inline button press) for conversion to core [`Message`].
/// The chat is the one holding the keyboard message; without it (inaccessible message) the
/// presser's private chat is used.
pub struct TelegramCallbackWrapper<'a>(pub &'a CallbackQuery);

impl<'a> ToCoreMessage for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Message {
        let query = self.0;
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat().id.0)
            .unwrap_or(query.from.id.0 as i64);
        Message {
            id: query
                .message
                .as_ref()
                .map(|m| m.id().to_string())
                .unwrap_or_else(|| "callback".to_string()),
            user: TelegramUserWrapper(&query.from).to_core(),
            chat: Chat::private(chat_id),
            kind: MessageKind::Callback(query.data.clone().unwrap_or_default()),
            created_at: chrono::Utc::now(),
        }
    }
}
