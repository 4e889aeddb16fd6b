//! Task queue (producer side) and the single worker thread (consumer side).
//!
//! **Data flow:** [`TaskQueue::submit`] → unbounded mpsc → [`Worker`] thread `blocking_recv` →
//! [`InferenceEngine::run`] → input cleanup → [`CompletionHandle::complete`](crate::CompletionHandle::complete).
//! Exactly one consumer exists, so tasks run one at a time in submission order.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument, warn};

use crate::engine::InferenceEngine;
use crate::error::{InferenceError, QueueError};
use crate::task::{CompletionHandle, Task, TaskId, TaskInputs, TaskOutcome};

const WORKER_THREAD_NAME: &str = "style-worker";

/// What the submitter gets back: the task id, its place in line, and the outcome receiver.
#[derive(Debug)]
pub struct Submission {
    pub task_id: TaskId,
    /// 1 when the worker is idle; otherwise 1 + tasks ahead (including the one running).
    pub position: usize,
    pub completion: oneshot::Receiver<TaskOutcome>,
}

/// Cloneable producer handle. Usable from async code; never blocks.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Task>,
    pending: Arc<AtomicUsize>,
}

impl TaskQueue {
    /// Creates the queue and its (not yet started) worker. Results are written under `results_dir`.
    pub fn new(results_dir: impl Into<PathBuf>) -> (Self, Worker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let queue = Self {
            tx,
            pending: pending.clone(),
        };
        let worker = Worker {
            rx,
            pending,
            results_dir: results_dir.into(),
        };
        (queue, worker)
    }

    /// Enqueues a task for `chat_id`. Fails only when the worker has shut down.
    #[instrument(skip(self, inputs))]
    pub fn submit(&self, chat_id: i64, inputs: TaskInputs) -> Result<Submission, QueueError> {
        let (completion, rx) = CompletionHandle::new();
        let task = Task::new(chat_id, inputs, completion);
        let task_id = task.id;

        let position = self.pending.fetch_add(1, Ordering::SeqCst) + 1;
        if self.tx.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!(chat_id = chat_id, "Task queue closed; worker is not running");
            return Err(QueueError::Closed);
        }

        info!(chat_id = chat_id, task_id = %task_id, position = position, "Task enqueued");
        Ok(Submission {
            task_id,
            position,
            completion: rx,
        })
    }

    /// Tasks submitted but not yet completed.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

/// The single consumer. Owns the receiving end; start it with [`Worker::spawn`].
#[derive(Debug)]
pub struct Worker {
    rx: mpsc::UnboundedReceiver<Task>,
    pending: Arc<AtomicUsize>,
    results_dir: PathBuf,
}

impl Worker {
    /// Starts the dedicated worker thread. It exits once every [`TaskQueue`] clone is dropped
    /// and the remaining tasks are drained.
    pub fn spawn(self, engine: Arc<dyn InferenceEngine>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run(engine))
    }

    fn run(mut self, engine: Arc<dyn InferenceEngine>) {
        if let Err(e) = std::fs::create_dir_all(&self.results_dir) {
            error!(error = %e, results_dir = %self.results_dir.display(), "Failed to create results directory");
        }
        info!(results_dir = %self.results_dir.display(), "Worker started");

        while let Some(task) = self.rx.blocking_recv() {
            self.process(engine.as_ref(), task);
        }

        info!("Task queue closed; worker exiting");
    }

    fn process(&self, engine: &dyn InferenceEngine, task: Task) {
        let Task {
            id,
            chat_id,
            inputs,
            created_at,
            completion,
        } = task;
        let kind = inputs.kind();
        let output = self.result_path(id);
        let waited_ms = (chrono::Utc::now() - created_at).num_milliseconds();
        info!(
            task_id = %id,
            chat_id = chat_id,
            kind = kind.as_str(),
            waited_ms = waited_ms,
            "Processing task"
        );

        let result = run_guarded(engine, &inputs, &output);
        remove_inputs(&inputs);

        match &result {
            Ok(path) => info!(task_id = %id, chat_id = chat_id, result = %path.display(), "Task finished"),
            Err(e) => error!(task_id = %id, chat_id = chat_id, error = %e, "Task failed"),
        }

        self.pending.fetch_sub(1, Ordering::SeqCst);
        completion.complete(TaskOutcome {
            task_id: id,
            chat_id,
            kind,
            result,
        });
    }

    /// Result file for a task; unique per task so concurrent deliveries never share a path.
    pub fn result_path(&self, task_id: TaskId) -> PathBuf {
        self.results_dir.join(format!("{}.jpg", task_id))
    }
}

/// Runs the engine, turning a panic or a missing output file into an error.
fn run_guarded(
    engine: &dyn InferenceEngine,
    inputs: &TaskInputs,
    output: &Path,
) -> Result<PathBuf, InferenceError> {
    let run = panic::catch_unwind(AssertUnwindSafe(|| engine.run(inputs, output)));
    match run {
        Ok(Ok(())) if output.exists() => Ok(output.to_path_buf()),
        Ok(Ok(())) => Err(InferenceError::MissingOutput(output.to_path_buf())),
        Ok(Err(e)) => Err(e),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(InferenceError::Panicked(reason))
        }
    }
}

/// Deletes the task's uploaded images regardless of outcome.
fn remove_inputs(inputs: &TaskInputs) {
    for path in inputs.image_paths() {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %path.display(), "Failed to remove input image"),
        }
    }
}
