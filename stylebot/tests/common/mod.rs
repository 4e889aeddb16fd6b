//! Shared helpers for stylebot integration tests: message builders, fake inference engines,
//! and waiting on the mock bot's outbound records.

#![allow(dead_code)]

pub mod mock_bot;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc as std_mpsc, Mutex, Once};
use std::time::Duration;

use chrono::Utc;
use style_worker::{InferenceEngine, InferenceError, TaskInputs};
use stylebot::TransferConfig;
use stylebot_core::{Chat, Message, MessageKind, PhotoRef, User};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use mock_bot::Sent;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once per test process; `RUST_LOG` controls the level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,stylebot=debug,style_worker=debug"));
        let _ = fmt().with_env_filter(env_filter).with_test_writer().try_init();
    });
}

/// Transfer config rooted in a temp dir; the scripts are never run by the fake engines.
pub fn transfer_config(root: &Path) -> TransferConfig {
    TransferConfig {
        images_dir: root.join("images"),
        results_dir: root.join("images").join("result"),
        python: "python".to_string(),
        nst_script: PathBuf::from("models/NST/nst.py"),
        gan_script: PathBuf::from("models/GAN/test.py"),
        gan_checkpoints_dir: PathBuf::from("models/GAN/weights"),
        gan_result: root.join("images").join("result").join("res.jpg"),
        state_ttl_secs: 3600,
    }
}

fn message(chat_id: i64, id: u32, kind: MessageKind) -> Message {
    Message {
        id: id.to_string(),
        user: User {
            id: chat_id,
            username: Some(format!("user{}", chat_id)),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat::private(chat_id),
        kind,
        created_at: Utc::now(),
    }
}

pub fn text(chat_id: i64, id: u32, text: &str) -> Message {
    message(chat_id, id, MessageKind::Text(text.to_string()))
}

/// Photo message whose download writes `photo:<file_id>`.
pub fn photo(chat_id: i64, id: u32, file_id: &str) -> Message {
    message(
        chat_id,
        id,
        MessageKind::Photo {
            photo: PhotoRef {
                file_id: file_id.to_string(),
                unique_id: format!("u-{}", file_id),
            },
            caption: None,
        },
    )
}

pub fn callback(chat_id: i64, id: u32, data: &str) -> Message {
    message(chat_id, id, MessageKind::Callback(data.to_string()))
}

/// Sticker, voice, document...
pub fn other(chat_id: i64, id: u32) -> Message {
    message(chat_id, id, MessageKind::Other)
}

/// Waits for the next outbound record; panics after 5 seconds.
pub async fn next_sent(rx: &mut mpsc::UnboundedReceiver<Sent>) -> Sent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for the bot to send something")
        .expect("mock bot channel closed")
}

/// Everything sent so far, without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Sent>) -> Vec<Sent> {
    let mut sent = Vec::new();
    while let Ok(s) = rx.try_recv() {
        sent.push(s);
    }
    sent
}

/// Files directly under `dir` (not recursive).
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default()
}

/// Polls until `cond` holds; panics after 5 seconds.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 5 seconds");
}

/// Copies the content image to the output, so each result carries the upload it came from.
/// Records every run and checks that runs never overlap.
pub struct CopyEngine {
    pub runs: Mutex<Vec<TaskInputs>>,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
    delay: Duration,
}

impl CopyEngine {
    pub fn new(delay: Duration) -> Self {
        Self {
            runs: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            delay,
        }
    }
}

impl InferenceEngine for CopyEngine {
    fn run(&self, inputs: &TaskInputs, output: &Path) -> Result<(), InferenceError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        let result = std::fs::copy(inputs.content(), output).map(|_| ());
        self.runs.lock().unwrap().push(inputs.clone());
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(result?)
    }
}

/// Always fails like a crashed model script.
pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn run(&self, _inputs: &TaskInputs, _output: &Path) -> Result<(), InferenceError> {
        Err(InferenceError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "CUDA out of memory".to_string(),
        })
    }
}

/// Holds every run until the test releases it through the gate.
pub struct GatedEngine {
    gate: Mutex<std_mpsc::Receiver<()>>,
}

impl GatedEngine {
    pub fn new() -> (Self, std_mpsc::Sender<()>) {
        let (tx, rx) = std_mpsc::channel();
        (Self { gate: Mutex::new(rx) }, tx)
    }
}

impl InferenceEngine for GatedEngine {
    fn run(&self, inputs: &TaskInputs, output: &Path) -> Result<(), InferenceError> {
        let _ = self.gate.lock().unwrap().recv();
        std::fs::copy(inputs.content(), output)?;
        Ok(())
    }
}
