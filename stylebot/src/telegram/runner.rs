//! Update dispatch: converts teloxide messages and callback queries to core::Message and passes
//! them to the HandlerChain. Long polling by default, webhook listener when configured.
//! The dispatcher fetches the bot's own [`Me`] at start and injects it into the endpoints.

use anyhow::{Context, Result};
use stylebot_core::ToCoreMessage;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Me, Message};
use teloxide::update_listeners::webhooks;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};
use crate::chain::HandlerChain;
use crate::config::WebhookConfig;

async fn on_message(msg: Message, me: Me, chain: HandlerChain) -> ResponseResult<()> {
    route_message(&msg, me.username(), &chain).await;
    Ok(())
}

/// Converts and routes one message. Commands that mention another bot (`/nst@other_bot` in a
/// group) are skipped.
pub async fn route_message(msg: &Message, bot_username: &str, chain: &HandlerChain) {
    let core_msg = TelegramMessageWrapper(msg).to_core();
    if !core_msg.is_addressed_to(bot_username) {
        debug!(
            chat_id = core_msg.chat.id,
            target = ?core_msg.command_target(),
            "Command addressed to another bot; skipped"
        );
        return;
    }
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        kind = core_msg.kind_name(),
        "Received message"
    );
    if let Err(e) = chain.handle(&core_msg).await {
        error!(error = %e, chat_id = core_msg.chat.id, "Handler chain failed");
    }
}

/// Answers the query (clears the client's spinner) and routes the press through the chain.
/// A failed answer, e.g. a press older than Telegram's answer window, still gets routed.
pub async fn on_callback(bot: Bot, query: CallbackQuery, chain: HandlerChain) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, query_id = ?query.id, "Failed to answer callback query");
    }

    let core_msg = TelegramCallbackWrapper(&query).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        data = ?query.data,
        "Received callback query"
    );
    if let Err(e) = chain.handle(&core_msg).await {
        error!(error = %e, chat_id = core_msg.chat.id, "Handler chain failed");
    }
    Ok(())
}

/// Runs the dispatcher until Ctrl-C. Updates from one chat are handled sequentially;
/// different chats are handled concurrently.
#[instrument(skip(bot, chain, webhook))]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    chain: HandlerChain,
    webhook: Option<WebhookConfig>,
) -> Result<()> {
    let schema = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema)
        .dependencies(dptree::deps![chain])
        .enable_ctrlc_handler()
        .build();

    match webhook {
        Some(webhook) => {
            let addr = webhook.socket_addr()?;
            let url = webhook
                .url
                .parse()
                .with_context(|| format!("WEBHOOK_URL is not a valid URL: {}", webhook.url))?;
            let listener = webhooks::axum(bot, webhooks::Options::new(addr, url).drop_pending_updates())
                .await
                .context("Failed to start webhook listener")?;
            info!(addr = %addr, url = %webhook.url, "Dispatching updates from webhook");
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
        None => {
            info!("Dispatching updates with long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}
