//! Component factory: builds the stores, the task queue with its worker thread, result delivery
//! and the handler chain. Isolates assembly from the runner so tests can inject a mock Bot and
//! a fake inference engine.

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use style_worker::{InferenceEngine, TaskQueue};
use stylebot_core::Bot;
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::config::{BotConfig, TransferConfig};
use crate::conversation::ConversationStore;
use crate::delivery::ResultDelivery;
use crate::handlers::{CommandHandler, ConversationHandler, FallbackHandler, LoggingHandler};
use crate::images::ImageStore;

pub struct BotComponents {
    pub bot: Arc<dyn Bot>,
    pub store: Arc<ConversationStore>,
    pub images: ImageStore,
    pub queue: TaskQueue,
    pub delivery: Arc<ResultDelivery>,
    pub worker: JoinHandle<()>,
}

/// teloxide Bot for the configured token, pointed at TELEGRAM_API_URL when set.
pub fn build_teloxide_bot(config: &BotConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Creates the image directories, starts the worker thread and wires delivery.
#[instrument(skip(transfer, bot, engine))]
pub fn build_bot_components(
    transfer: &TransferConfig,
    bot: Arc<dyn Bot>,
    engine: Arc<dyn InferenceEngine>,
) -> Result<BotComponents> {
    let images = ImageStore::new(&transfer.images_dir, &transfer.results_dir);
    images.ensure_dirs().with_context(|| {
        format!(
            "Failed to create image directories {} and {}",
            images.images_dir().display(),
            images.results_dir().display()
        )
    })?;

    let (queue, worker) = TaskQueue::new(images.results_dir());
    let worker = worker
        .spawn(engine)
        .context("Failed to start style worker thread")?;
    info!(
        images_dir = %images.images_dir().display(),
        results_dir = %images.results_dir().display(),
        "Style worker started"
    );

    Ok(BotComponents {
        delivery: Arc::new(ResultDelivery::new(bot.clone())),
        store: Arc::new(ConversationStore::new()),
        bot,
        images,
        queue,
        worker,
    })
}

/// Logging → commands → conversation → fallback.
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(CommandHandler::new(
            components.bot.clone(),
            components.store.clone(),
        )))
        .add_handler(Arc::new(ConversationHandler::new(
            components.bot.clone(),
            components.store.clone(),
            components.images.clone(),
            components.queue.clone(),
            components.delivery.clone(),
        )))
        .add_handler(Arc::new(FallbackHandler::new(components.bot.clone())))
}
