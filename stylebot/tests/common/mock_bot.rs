//! Mock implementation of [`stylebot_core::Bot`] for integration tests.
//!
//! Every outbound call is recorded as a [`Sent`] on an unbounded channel so tests can wait for
//! replies and result photos without hitting Telegram. Downloads write `photo:<file_id>` to the
//! destination, so a delivered result can be traced back to the upload it came from.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stylebot_core::{Bot, BotError, Chat, HandlerError, Keyboard, PhotoRef, Result};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
    },
    Keyboard {
        chat_id: i64,
        text: String,
        keyboard: Keyboard,
    },
    Photo {
        chat_id: i64,
        caption: Option<String>,
        /// File contents at send time (the file is removed right after).
        bytes: Vec<u8>,
    },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Sent::Text { chat_id, .. } | Sent::Keyboard { chat_id, .. } | Sent::Photo { chat_id, .. } => {
                *chat_id
            }
        }
    }
}

pub struct MockBot {
    tx: mpsc::UnboundedSender<Sent>,
    fail_downloads: AtomicBool,
    download_delay_ms: AtomicU64,
}

impl MockBot {
    /// Creates a MockBot and returns the receiver for sent records.
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bot = Arc::new(Self {
            tx,
            fail_downloads: AtomicBool::new(false),
            download_delay_ms: AtomicU64::new(0),
        });
        (bot, rx)
    }

    /// Makes every following download fail.
    pub fn fail_downloads(&self, fail: bool) {
        self.fail_downloads.store(fail, Ordering::SeqCst);
    }

    /// Makes every following download take at least `delay`.
    pub fn delay_downloads(&self, delay: Duration) {
        self.download_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        let _ = self.tx.send(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_keyboard(&self, chat: &Chat, text: &str, keyboard: &Keyboard) -> Result<()> {
        let _ = self.tx.send(Sent::Keyboard {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, path: &Path, caption: Option<&str>) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let _ = self.tx.send(Sent::Photo {
            chat_id: chat.id,
            caption: caption.map(|c| c.to_string()),
            bytes,
        });
        Ok(())
    }

    async fn download_photo(&self, photo: &PhotoRef, dest: &Path) -> Result<()> {
        let delay = self.download_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(BotError::Handler(HandlerError::Download {
                file_id: photo.file_id.clone(),
                reason: "connection reset".to_string(),
            }));
        }
        std::fs::write(dest, format!("photo:{}", photo.file_id))?;
        Ok(())
    }
}
