//! Per-chat conversation states. Scratch data (the stored style image, the chosen variant) lives
//! inside the state that needs it, so leaving the state drops it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use style_worker::GanVariant;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    /// `/nst` received; waiting for the style photo.
    AwaitingStyle,
    /// Style photo stored at `style`; waiting for the content photo.
    AwaitingContentNst { style: PathBuf },
    /// `/gan` received; waiting for a button press.
    AwaitingGanVariant,
    AwaitingContentGan { variant: GanVariant },
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationState::Idle)
    }

    /// Local file owned by this state, removed when the conversation is abandoned.
    pub fn stored_image(&self) -> Option<&Path> {
        match self {
            ConversationState::AwaitingContentNst { style } => Some(style.as_path()),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitingStyle => "awaiting_style",
            ConversationState::AwaitingContentNst { .. } => "awaiting_content_nst",
            ConversationState::AwaitingGanVariant => "awaiting_gan_variant",
            ConversationState::AwaitingContentGan { .. } => "awaiting_content_gan",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub state: ConversationState,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(state: ConversationState) -> Self {
        Self {
            state,
            updated_at: Utc::now(),
        }
    }
}
