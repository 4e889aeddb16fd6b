use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use style_worker::{InferenceEngine, ScriptInference};
use stylebot_core::{init_tracing, Bot, HandlerResponse, Message};
use teloxide::prelude::Requester;
use teloxide::utils::command::BotCommands;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, build_teloxide_bot, BotComponents};
use crate::config::{BotConfig, TransferConfig};
use crate::conversation::ConversationStore;
use crate::delivery::ResultDelivery;
use crate::telegram::{run_dispatcher, Command, TelegramBotAdapter};

/// Upper bound on how often abandoned conversations are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Assembled bot: components plus the handler chain that drives them.
pub struct StyleBot {
    pub components: BotComponents,
    pub handler_chain: HandlerChain,
}

impl StyleBot {
    /// Builds the bot around any [`Bot`] and [`InferenceEngine`]; used by run_bot and by tests.
    pub fn new(
        transfer: &TransferConfig,
        bot: Arc<dyn Bot>,
        engine: Arc<dyn InferenceEngine>,
    ) -> Result<Self> {
        let components = build_bot_components(transfer, bot, engine)?;
        let handler_chain = build_handler_chain(&components);
        Ok(Self {
            components,
            handler_chain,
        })
    }

    pub fn store(&self) -> &ConversationStore {
        &self.components.store
    }

    /// Drive the handler chain with a core Message (for integration tests).
    #[doc(hidden)]
    pub async fn handle_core_message(&self, message: &Message) -> Result<HandlerResponse> {
        Ok(self.handler_chain.handle(message).await?)
    }
}

/// Periodically drops conversations idle for longer than `ttl` and forgets delivered task ids
/// older than `ttl`.
pub fn spawn_expiry_sweeper(
    store: Arc<ConversationStore>,
    delivery: Arc<ResultDelivery>,
    ttl: Duration,
) -> JoinHandle<()> {
    let period = ttl.min(MAX_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = store.expire_idle(ttl);
            if removed > 0 {
                info!(removed = removed, "Expired idle conversations");
            }
            let forgotten = delivery.forget_delivered(ttl);
            if forgotten > 0 {
                debug!(forgotten = forgotten, "Forgot delivered task ids");
            }
        }
    })
}

/// Main entry: validate config, init logging, build components, then dispatch updates until Ctrl-C.
/// `force_polling` ignores WEBHOOK_URL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig, force_polling: bool) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    let transfer = config.transfer();
    info!(
        python = %transfer.python,
        nst_script = %transfer.nst_script.display(),
        gan_script = %transfer.gan_script.display(),
        state_ttl_secs = transfer.state_ttl_secs,
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&config);
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let engine: Arc<dyn InferenceEngine> = Arc::new(ScriptInference::new(transfer.script_config()));
    let style_bot = StyleBot::new(transfer, bot, engine)?;

    let sweeper = spawn_expiry_sweeper(
        style_bot.components.store.clone(),
        style_bot.components.delivery.clone(),
        transfer.state_ttl(),
    );

    if let Err(e) = teloxide_bot.set_my_commands(Command::bot_commands()).await {
        error!(error = %e, "Failed to register bot commands");
    }

    let webhook = if force_polling {
        None
    } else {
        config.base().webhook.clone()
    };

    info!(webhook = webhook.is_some(), "Bot started successfully");
    run_dispatcher(teloxide_bot, style_bot.handler_chain.clone(), webhook).await?;

    sweeper.abort();
    info!(
        pending_tasks = style_bot.components.queue.pending(),
        "Bot stopped"
    );
    Ok(())
}
