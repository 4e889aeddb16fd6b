//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Chat (private or group) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// Private chat with the given id. Results are routed back by id only, so the type is informational.
    pub fn private(id: i64) -> Self {
        Self {
            id,
            chat_type: "private".to_string(),
        }
    }
}
