//! Update routing from teloxide types into the handler chain.
//!
//! Callback presses are answered first (against a mock Telegram Bot API); whether or not Telegram
//! accepts the answer, the press must reach the chain. Group commands that name another bot are
//! not routed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockito::Matcher;
use stylebot::telegram::{on_callback, route_message};
use stylebot::HandlerChain;
use stylebot_core::{Handler, HandlerResponse, Message, Result};
use teloxide::types::CallbackQuery;

const BOT_USERNAME: &str = "style_bot";

const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

/// Counts handled messages and keeps the callback data or command it saw.
#[derive(Default)]
struct PressCounter {
    runs: AtomicUsize,
    data: Mutex<Vec<String>>,
}

#[async_trait]
impl Handler for PressCounter {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let seen = message
            .callback_data()
            .or_else(|| message.command())
            .unwrap_or_default();
        self.data.lock().unwrap().push(seen.to_string());
        Ok(HandlerResponse::Stop)
    }
}

fn monet_press() -> CallbackQuery {
    serde_json::from_value(serde_json::json!({
        "id": "4382bfdwdsb323b2d9",
        "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
        "message": {
            "message_id": 7,
            "date": 1706529600,
            "chat": {"id": 42, "type": "private", "first_name": "Ann"},
            "text": "Choose a style:"
        },
        "chat_instance": "-8871524212471547133",
        "data": "monet"
    }))
    .unwrap()
}

fn bot(server: &mockito::ServerGuard) -> teloxide::Bot {
    let url = reqwest::Url::parse(&server.url()).unwrap();
    teloxide::Bot::new(TEST_BOT_TOKEN).set_api_url(url)
}

fn answer_path() -> Matcher {
    Matcher::Regex(format!(r"(?i)^/bot{}/answerCallbackQuery$", TEST_BOT_TOKEN))
}

async fn route_press(status: usize, body: &str) -> (Arc<PressCounter>, bool) {
    let mut server = mockito::Server::new_async().await;
    let answer = server
        .mock("POST", answer_path())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let counter = Arc::new(PressCounter::default());
    let chain = HandlerChain::new().add_handler(counter.clone());
    let result = on_callback(bot(&server), monet_press(), chain).await;

    answer.assert_async().await;
    (counter, result.is_ok())
}

/// **Test: An answered press is routed to the chain with its data.**
#[tokio::test]
async fn test_answered_press_is_routed() {
    let (counter, ok) = route_press(200, r#"{"ok": true, "result": true}"#).await;

    assert!(ok);
    assert_eq!(counter.runs.load(Ordering::SeqCst), 1);
    assert_eq!(*counter.data.lock().unwrap(), vec!["monet"]);
}

/// **Test: A press Telegram refuses to answer (too old) still reaches the chain.**
#[tokio::test]
async fn test_stale_press_is_still_routed() {
    let (counter, ok) = route_press(
        400,
        r#"{"ok": false, "error_code": 400, "description": "Bad Request: query is too old and response timeout expired or query ID is invalid"}"#,
    )
    .await;

    assert!(ok);
    assert_eq!(counter.runs.load(Ordering::SeqCst), 1);
    assert_eq!(*counter.data.lock().unwrap(), vec!["monet"]);
}

fn group_text(text: &str) -> teloxide::types::Message {
    serde_json::from_value(serde_json::json!({
        "message_id": 11,
        "date": 1706529600,
        "chat": {"id": -100500, "type": "group", "title": "Painters"},
        "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
        "text": text
    }))
    .unwrap()
}

async fn route_text(text: &str) -> Arc<PressCounter> {
    let counter = Arc::new(PressCounter::default());
    let chain = HandlerChain::new().add_handler(counter.clone());
    route_message(&group_text(text), BOT_USERNAME, &chain).await;
    counter
}

/// **Test: Commands for this bot, with or without the mention, reach the chain.**
#[tokio::test]
async fn test_own_commands_are_routed() {
    for text in ["/nst", "/nst@style_bot", "/gan@Style_Bot now"] {
        let counter = route_text(text).await;
        assert_eq!(counter.runs.load(Ordering::SeqCst), 1, "{}", text);
    }
}

/// **Test: A command that names another bot is not routed at all.**
#[tokio::test]
async fn test_command_for_other_bot_is_skipped() {
    let counter = route_text("/nst@some_other_bot").await;
    assert_eq!(counter.runs.load(Ordering::SeqCst), 0);
    assert!(counter.data.lock().unwrap().is_empty());
}
