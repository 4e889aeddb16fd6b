//! Conversation state machine for `/nst` and `/gan`.
//!
//! Idle → `/nst` → AwaitingStyle → photo → AwaitingContentNst → photo → task queued → Idle.
//! Idle → `/gan` → AwaitingGanVariant → button → AwaitingContentGan → photo → task queued → Idle.
//! `/cancel` returns any non-Idle chat to Idle. Wrong input in an awaiting state gets one
//! contextual error and leaves the state as it was.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use style_worker::{GanVariant, TaskInputs, TaskQueue};
use stylebot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{error, info, instrument, warn};

use super::{reply, reply_with_keyboard};
use crate::conversation::{remove_image, ConversationState, ConversationStore};
use crate::delivery::ResultDelivery;
use crate::images::ImageStore;
use crate::messages;

pub struct ConversationHandler {
    bot: Arc<dyn Bot>,
    store: Arc<ConversationStore>,
    images: ImageStore,
    queue: TaskQueue,
    delivery: Arc<ResultDelivery>,
}

impl ConversationHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: Arc<ConversationStore>,
        images: ImageStore,
        queue: TaskQueue,
        delivery: Arc<ResultDelivery>,
    ) -> Self {
        Self {
            bot,
            store,
            images,
            queue,
            delivery,
        }
    }

    async fn on_idle(&self, message: &Message) -> HandlerResponse {
        let chat_id = message.chat.id;
        match message.command() {
            Some("nst") => {
                self.store.set(chat_id, ConversationState::AwaitingStyle);
                reply(self.bot.as_ref(), &message.chat, messages::NST_PROMPT).await;
                HandlerResponse::Stop
            }
            Some("gan") => {
                self.store.set(chat_id, ConversationState::AwaitingGanVariant);
                reply_with_keyboard(
                    self.bot.as_ref(),
                    &message.chat,
                    messages::GAN_PROMPT,
                    &messages::gan_keyboard(),
                )
                .await;
                HandlerResponse::Stop
            }
            // Nothing to cancel: silently swallowed.
            Some("cancel") => HandlerResponse::Stop,
            _ => HandlerResponse::Continue,
        }
    }

    async fn cancel(&self, message: &Message) {
        let previous = self.store.reset(message.chat.id);
        if let Some(path) = previous.stored_image() {
            remove_image(path);
        }
        info!(chat_id = message.chat.id, from = previous.name(), "Conversation cancelled");
        reply(self.bot.as_ref(), &message.chat, messages::CANCELLED).await;
    }

    /// Downloads the message's photo to its upload path. `None` when the message has no photo
    /// (after sending `not_a_photo`) or the download failed (after sending the download error).
    async fn receive_photo(&self, message: &Message, not_a_photo: &str) -> Option<PathBuf> {
        let Some(photo) = message.photo() else {
            reply(self.bot.as_ref(), &message.chat, not_a_photo).await;
            return None;
        };
        let path = self.images.upload_path(message, photo);
        match self.bot.download_photo(photo, &path).await {
            Ok(()) => Some(path),
            Err(e) => {
                error!(error = %e, chat_id = message.chat.id, file_id = %photo.file_id, "Photo download failed");
                remove_image(&path);
                reply(self.bot.as_ref(), &message.chat, messages::DOWNLOAD_ERROR).await;
                None
            }
        }
    }

    /// Queues the task, returns the chat to Idle and tells the user where they are in line.
    async fn submit(&self, message: &Message, inputs: TaskInputs) {
        let chat_id = message.chat.id;
        match self.queue.submit(chat_id, inputs.clone()) {
            Ok(submission) => {
                self.store.set(chat_id, ConversationState::Idle);
                reply(
                    self.bot.as_ref(),
                    &message.chat,
                    &messages::processing(submission.position),
                )
                .await;
                self.delivery.watch(chat_id, submission);
            }
            Err(e) => {
                error!(error = %e, chat_id = chat_id, "Failed to queue task");
                for path in inputs.image_paths() {
                    remove_image(path);
                }
                self.store.set(chat_id, ConversationState::Idle);
                reply(self.bot.as_ref(), &message.chat, messages::QUEUE_UNAVAILABLE).await;
            }
        }
    }

    async fn on_awaiting_style(&self, message: &Message) {
        if let Some(style) = self.receive_photo(message, messages::STYLE_ERROR).await {
            self.store
                .set(message.chat.id, ConversationState::AwaitingContentNst { style });
            reply(self.bot.as_ref(), &message.chat, messages::AWAITING_CONTENT_NST).await;
        }
    }

    async fn on_awaiting_content_nst(&self, message: &Message, style: PathBuf) {
        let Some(content) = self.receive_photo(message, messages::CONTENT_ERROR).await else {
            return;
        };
        // The session (and its style photo) may have expired while the content was downloading.
        let expected = ConversationState::AwaitingContentNst {
            style: style.clone(),
        };
        if self.store.get(message.chat.id) != expected || !style.exists() {
            warn!(chat_id = message.chat.id, "Style photo gone before submit; dropping content");
            remove_image(&content);
            if let Some(path) = self.store.reset(message.chat.id).stored_image() {
                remove_image(path);
            }
            reply(self.bot.as_ref(), &message.chat, messages::SESSION_EXPIRED).await;
            return;
        }
        self.submit(message, TaskInputs::StyleTransfer { style, content })
            .await;
    }

    async fn on_awaiting_variant(&self, message: &Message) {
        match message.callback_data().and_then(GanVariant::from_callback_data) {
            Some(variant) => {
                self.store
                    .set(message.chat.id, ConversationState::AwaitingContentGan { variant });
                info!(chat_id = message.chat.id, variant = variant.label(), "GAN style chosen");
                reply(self.bot.as_ref(), &message.chat, messages::AWAITING_CONTENT_GAN).await;
            }
            None => {
                if let Some(data) = message.callback_data() {
                    warn!(chat_id = message.chat.id, data = %data, "Unknown GAN style button");
                }
                reply(self.bot.as_ref(), &message.chat, messages::CHOOSE_VARIANT_ERROR).await;
            }
        }
    }

    async fn on_awaiting_content_gan(&self, message: &Message, variant: GanVariant) {
        if let Some(content) = self.receive_photo(message, messages::CONTENT_ERROR).await {
            self.submit(message, TaskInputs::GanTransfer { variant, content })
                .await;
        }
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, kind = message.kind_name()))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let state = self.store.get(message.chat.id);
        if state.is_idle() {
            return Ok(self.on_idle(message).await);
        }
        if message.command() == Some("cancel") {
            self.cancel(message).await;
            return Ok(HandlerResponse::Stop);
        }
        self.store.touch(message.chat.id);

        match state {
            ConversationState::Idle => {}
            ConversationState::AwaitingStyle => self.on_awaiting_style(message).await,
            ConversationState::AwaitingContentNst { style } => {
                self.on_awaiting_content_nst(message, style).await
            }
            ConversationState::AwaitingGanVariant => self.on_awaiting_variant(message).await,
            ConversationState::AwaitingContentGan { variant } => {
                self.on_awaiting_content_gan(message, variant).await
            }
        }
        Ok(HandlerResponse::Stop)
    }
}
