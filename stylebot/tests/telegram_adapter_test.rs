//! Integration tests for [`stylebot::TelegramBotAdapter`] against a mock Telegram Bot API.
//!
//! teloxide request paths are `/bot<token>/<Method>`; matched case-insensitively since the
//! Bot API treats method names that way. Mock guards must live until the request completes.

use mockito::Matcher;
use stylebot::TelegramBotAdapter;
use stylebot_core::{Bot, BotError, Chat, HandlerError, Keyboard, MenuButton, PhotoRef};

const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

const SENT_MESSAGE_BODY: &str = r#"{
    "ok": true,
    "result": {
        "message_id": 1,
        "date": 1706529600,
        "chat": {"id": 123, "type": "private", "first_name": "Test"},
        "from": {"id": 123456789, "is_bot": true, "first_name": "TestBot", "username": "testbot"},
        "text": "ok"
    }
}"#;

fn method_path(method: &str) -> Matcher {
    Matcher::Regex(format!(r"(?i)^/bot{}/{}$", TEST_BOT_TOKEN, method))
}

fn adapter(server: &mockito::ServerGuard) -> TelegramBotAdapter {
    let url = reqwest::Url::parse(&server.url()).unwrap();
    TelegramBotAdapter::new(teloxide::Bot::new(TEST_BOT_TOKEN).set_api_url(url))
}

/// **Test: send_message posts to sendMessage with the chat id and text.**
#[tokio::test]
async fn test_send_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""chat_id":\s*123"#.to_string()),
            Matcher::Regex("Send me the style photo".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SENT_MESSAGE_BODY)
        .create_async()
        .await;

    adapter(&server)
        .send_message(&Chat::private(123), "Send me the style photo.")
        .await
        .unwrap();

    mock.assert_async().await;
}

/// **Test: send_keyboard attaches an inline keyboard with the button callback data.**
#[tokio::test]
async fn test_send_inline_keyboard() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("inline_keyboard".to_string()),
            Matcher::Regex(r#""callback_data":\s*"vangogh""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SENT_MESSAGE_BODY)
        .create_async()
        .await;

    let keyboard = Keyboard::Inline(vec![
        MenuButton::new("Monet", "monet"),
        MenuButton::new("Van Gogh", "vangogh"),
    ]);
    adapter(&server)
        .send_keyboard(&Chat::private(123), "Choose a style:", &keyboard)
        .await
        .unwrap();

    mock.assert_async().await;
}

/// **Test: A Telegram API error surfaces as BotError::Bot.**
#[tokio::test]
async fn test_api_error_is_bot_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("sendMessage"))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let err = adapter(&server)
        .send_message(&Chat::private(999), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Bot(_)), "unexpected error: {:?}", err);
}

/// **Test: download_photo resolves the file with getFile and writes the bytes to the destination.**
#[tokio::test]
async fn test_download_photo() {
    let mut server = mockito::Server::new_async().await;
    let get_file = server
        .mock("POST", method_path("getFile"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "ok": true,
            "result": {
                "file_id": "file-1",
                "file_unique_id": "uniq-1",
                "file_size": 4,
                "file_path": "photos/file_1.jpg"
            }
        }"#,
        )
        .create_async()
        .await;
    let file = server
        .mock("GET", format!("/file/bot{}/photos/file_1.jpg", TEST_BOT_TOKEN).as_str())
        .with_status(200)
        .with_body("jpeg")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("100-1-uniq-1.jpg");
    let photo = PhotoRef {
        file_id: "file-1".to_string(),
        unique_id: "uniq-1".to_string(),
    };
    adapter(&server).download_photo(&photo, &dest).await.unwrap();

    get_file.assert_async().await;
    file.assert_async().await;
    assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg");
}

/// **Test: An unknown file id is reported as a download error.**
#[tokio::test]
async fn test_download_photo_unknown_file() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("getFile"))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: invalid file_id"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = PhotoRef {
        file_id: "missing".to_string(),
        unique_id: "u".to_string(),
    };
    let err = adapter(&server)
        .download_photo(&photo, &dir.path().join("x.jpg"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, BotError::Handler(HandlerError::Download { ref file_id, .. }) if file_id == "missing"),
        "unexpected error: {:?}",
        err
    );
}
