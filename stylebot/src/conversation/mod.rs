//! Conversation state per chat and the store that holds it.

mod state;
mod store;

pub use state::{ChatSession, ConversationState};
pub use store::ConversationStore;
pub(crate) use store::remove_image;
