//! Keyboards attached to outgoing messages.

use serde::{Deserialize, Serialize};

/// One inline button: visible label and the callback data sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub label: String,
    pub data: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Keyboard variants the bot sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// Inline buttons under the message, one row.
    Inline(Vec<MenuButton>),
    /// Reply keyboard of commands (e.g. `/nst`), one row.
    Commands(Vec<String>),
}
