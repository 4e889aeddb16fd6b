//! Bot abstraction for replying to chats and fetching uploaded photos.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in `stylebot::telegram`.
//! Tests substitute a recording implementation.

use std::path::Path;

use crate::error::Result;
use crate::types::{Chat, Keyboard, PhotoRef};
use async_trait::async_trait;

/// Abstraction for outbound chat I/O. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a text message with an inline or reply keyboard attached.
    async fn send_keyboard(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<()>;
    /// Uploads a local image file as a photo, with optional caption.
    async fn send_photo(&self, chat: &Chat, path: &Path, caption: Option<&str>) -> Result<()>;
    /// Downloads the photo to `dest`, overwriting it if present.
    async fn download_photo(&self, photo: &PhotoRef, dest: &Path) -> Result<()>;
}
