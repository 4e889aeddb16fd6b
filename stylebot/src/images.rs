//! Local storage for uploaded photos.

use std::path::{Path, PathBuf};

use stylebot_core::{Message, PhotoRef};

/// Upload paths are derived from chat, message and Telegram's per-file unique id,
/// so two uploads never collide and a retried download overwrites its own file.
#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
    results_dir: PathBuf,
}

impl ImageStore {
    pub fn new(images_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Creates both directories if missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.images_dir)?;
        std::fs::create_dir_all(&self.results_dir)
    }

    /// `<images_dir>/<chat_id>-<message_id>-<file_unique_id>.jpg`
    pub fn upload_path(&self, message: &Message, photo: &PhotoRef) -> PathBuf {
        let name = format!(
            "{}-{}-{}.jpg",
            message.chat.id,
            sanitize(&message.id),
            sanitize(&photo.unique_id)
        );
        self.images_dir.join(name)
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}
