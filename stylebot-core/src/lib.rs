//! # stylebot-core
//!
//! Core types and traits for the style-transfer bot: [`Bot`], [`Handler`], message and user types,
//! keyboards, errors and tracing initialization. Transport-agnostic; the Telegram layer in `stylebot`
//! converts teloxide types into these.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Keyboard, MenuButton, Message, MessageKind, PhotoRef,
    ToCoreMessage, ToCoreUser, User,
};
