//! Core types: user, chat, message, keyboards, handler response, and Handler trait.

mod chat;
mod handler;
mod keyboard;
mod message;
mod response;
mod user;

pub use chat::Chat;
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use keyboard::{Keyboard, MenuButton};
pub use message::{Message, MessageKind, PhotoRef};
pub use response::HandlerResponse;
pub use user::User;
