//! Task data model: what to run, for which chat, and how to report back.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::warn;
use uuid::Uuid;

use crate::error::InferenceError;

/// Unique task id; also names the task's result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    StyleTransfer,
    GanTransfer,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::StyleTransfer => "style_transfer",
            TaskKind::GanTransfer => "gan_transfer",
        }
    }
}

/// Pretrained CycleGAN styles offered in the `/gan` menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GanVariant {
    Cezanne,
    Monet,
    VanGogh,
}

impl GanVariant {
    pub const ALL: [GanVariant; 3] = [GanVariant::Cezanne, GanVariant::Monet, GanVariant::VanGogh];

    /// Callback data carried by the menu button.
    pub fn callback_data(&self) -> &'static str {
        match self {
            GanVariant::Cezanne => "cezanne",
            GanVariant::Monet => "monet",
            GanVariant::VanGogh => "vangogh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GanVariant::Cezanne => "Cezanne",
            GanVariant::Monet => "Monet",
            GanVariant::VanGogh => "Van Gogh",
        }
    }

    /// Model name; checkpoints live under `<model_name>_pretrained`.
    pub fn model_name(&self) -> &'static str {
        match self {
            GanVariant::Cezanne => "style_cezanne",
            GanVariant::Monet => "style_monet",
            GanVariant::VanGogh => "style_vangogh",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.callback_data() == data)
    }
}

/// Input images (and GAN style) for one task. Paths point at files the worker may delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInputs {
    StyleTransfer { style: PathBuf, content: PathBuf },
    GanTransfer { variant: GanVariant, content: PathBuf },
}

impl TaskInputs {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskInputs::StyleTransfer { .. } => TaskKind::StyleTransfer,
            TaskInputs::GanTransfer { .. } => TaskKind::GanTransfer,
        }
    }

    pub fn content(&self) -> &Path {
        match self {
            TaskInputs::StyleTransfer { content, .. } | TaskInputs::GanTransfer { content, .. } => {
                content
            }
        }
    }

    /// Every uploaded image this task owns.
    pub fn image_paths(&self) -> Vec<&Path> {
        match self {
            TaskInputs::StyleTransfer { style, content } => vec![style.as_path(), content.as_path()],
            TaskInputs::GanTransfer { content, .. } => vec![content.as_path()],
        }
    }
}

/// Result of one task, handed back to the async side.
#[derive(Debug)]
pub struct TaskOutcome {
    pub task_id: TaskId,
    pub chat_id: i64,
    pub kind: TaskKind,
    /// Per-task result image on success.
    pub result: Result<PathBuf, InferenceError>,
}

/// Fires the task's outcome back to whoever awaits it. Safe to call from the worker thread.
#[derive(Debug)]
pub struct CompletionHandle(oneshot::Sender<TaskOutcome>);

impl CompletionHandle {
    pub fn new() -> (Self, oneshot::Receiver<TaskOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    /// Consumes the handle; an outcome is delivered at most once.
    pub fn complete(self, outcome: TaskOutcome) {
        let task_id = outcome.task_id;
        if self.0.send(outcome).is_err() {
            warn!(task_id = %task_id, "Completion receiver dropped; outcome discarded");
        }
    }
}

/// One unit of pending inference work.
#[derive(Debug)]
pub struct Task {
    pub id: TaskId,
    pub chat_id: i64,
    pub inputs: TaskInputs,
    pub created_at: DateTime<Utc>,
    pub completion: CompletionHandle,
}

impl Task {
    pub fn new(chat_id: i64, inputs: TaskInputs, completion: CompletionHandle) -> Self {
        Self {
            id: TaskId::new(),
            chat_id,
            inputs,
            created_at: Utc::now(),
            completion,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.inputs.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gan_variant_callback_roundtrip_and_model_names() {
        assert_eq!(GanVariant::from_callback_data("monet"), Some(GanVariant::Monet));
        assert_eq!(GanVariant::from_callback_data("vangogh"), Some(GanVariant::VanGogh));
        assert_eq!(GanVariant::from_callback_data("picasso"), None);
        assert_eq!(GanVariant::Cezanne.model_name(), "style_cezanne");
        assert_eq!(GanVariant::VanGogh.label(), "Van Gogh");
    }

    #[test]
    fn test_inputs_kind_and_owned_images() {
        let nst = TaskInputs::StyleTransfer {
            style: PathBuf::from("images/s.jpg"),
            content: PathBuf::from("images/c.jpg"),
        };
        assert_eq!(nst.kind(), TaskKind::StyleTransfer);
        assert_eq!(nst.image_paths().len(), 2);
        assert_eq!(nst.content(), Path::new("images/c.jpg"));

        let gan = TaskInputs::GanTransfer {
            variant: GanVariant::Monet,
            content: PathBuf::from("images/c.jpg"),
        };
        assert_eq!(gan.kind(), TaskKind::GanTransfer);
        assert_eq!(gan.image_paths(), vec![Path::new("images/c.jpg")]);
    }

    #[tokio::test]
    async fn test_completion_handle_delivers_outcome() {
        let (handle, rx) = CompletionHandle::new();
        let task_id = TaskId::new();
        std::thread::spawn(move || {
            handle.complete(TaskOutcome {
                task_id,
                chat_id: 42,
                kind: TaskKind::GanTransfer,
                result: Ok(PathBuf::from("res.jpg")),
            });
        });
        let outcome = rx.await.unwrap();
        assert_eq!(outcome.task_id, task_id);
        assert_eq!(outcome.chat_id, 42);
    }
}
