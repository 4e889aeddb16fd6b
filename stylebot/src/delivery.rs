//! Sends task outcomes back to the chat that submitted them.
//!
//! The worker thread only fires the completion handle; everything that talks to Telegram runs
//! here, on the async runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use style_worker::{Submission, TaskId, TaskOutcome};
use stylebot_core::{Bot, Chat, Result};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::conversation::remove_image;
use crate::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Result photo sent.
    Delivered,
    /// The task failed (or the photo could not be sent) and the user was told.
    FailureReported,
    /// This task was handled before; nothing sent.
    AlreadyDelivered,
}

pub struct ResultDelivery {
    bot: Arc<dyn Bot>,
    /// Handled task ids and when they were handled; pruned by [`Self::forget_delivered`].
    delivered: DashMap<TaskId, Instant>,
}

impl ResultDelivery {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            delivered: DashMap::new(),
        }
    }

    /// Claims `task_id` for delivery. False when it was already handled.
    fn claim(&self, task_id: TaskId) -> bool {
        self.delivered.insert(task_id, Instant::now()).is_none()
    }

    /// Forgets task ids handled more than `older_than` ago. Returns how many were dropped.
    pub fn forget_delivered(&self, older_than: Duration) -> usize {
        let before = self.delivered.len();
        self.delivered.retain(|_, handled_at| handled_at.elapsed() < older_than);
        before.saturating_sub(self.delivered.len())
    }

    /// Number of task ids currently remembered.
    pub fn remembered(&self) -> usize {
        self.delivered.len()
    }

    /// Spawns a task that waits for the submission's outcome and delivers it.
    /// A completion handle dropped without an outcome is reported as a failure.
    pub fn watch(self: &Arc<Self>, chat_id: i64, submission: Submission) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let Submission {
            task_id,
            completion,
            ..
        } = submission;
        tokio::spawn(async move {
            let outcome = completion.await;
            let delivered = match outcome {
                Ok(outcome) => this.deliver(outcome).await,
                Err(_) => this.report_lost(task_id, chat_id).await,
            };
            if let Err(e) = delivered {
                error!(error = %e, task_id = %task_id, "Result delivery failed");
            }
        })
    }

    /// Delivers one outcome to `outcome.chat_id`. At most one delivery per task id.
    #[instrument(skip(self, outcome), fields(task_id = %outcome.task_id, chat_id = outcome.chat_id))]
    pub async fn deliver(&self, outcome: TaskOutcome) -> Result<DeliveryStatus> {
        if !self.claim(outcome.task_id) {
            warn!("Outcome already delivered; ignoring");
            return Ok(DeliveryStatus::AlreadyDelivered);
        }
        let chat = Chat::private(outcome.chat_id);

        match outcome.result {
            Ok(path) => {
                let sent = self
                    .bot
                    .send_photo(&chat, &path, Some(messages::FINISHED))
                    .await;
                remove_image(&path);
                match sent {
                    Ok(()) => {
                        info!(kind = outcome.kind.as_str(), "Result delivered");
                        Ok(DeliveryStatus::Delivered)
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to send result photo");
                        self.bot.send_message(&chat, messages::FAILED).await?;
                        Ok(DeliveryStatus::FailureReported)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, kind = outcome.kind.as_str(), "Reporting failed task to user");
                self.bot.send_message(&chat, messages::FAILED).await?;
                Ok(DeliveryStatus::FailureReported)
            }
        }
    }

    /// The worker dropped the completion handle without an outcome (it exited or died).
    async fn report_lost(&self, task_id: TaskId, chat_id: i64) -> Result<DeliveryStatus> {
        if !self.claim(task_id) {
            return Ok(DeliveryStatus::AlreadyDelivered);
        }
        error!(task_id = %task_id, chat_id = chat_id, "Task completion dropped without an outcome");
        self.bot
            .send_message(&Chat::private(chat_id), messages::FAILED)
            .await?;
        Ok(DeliveryStatus::FailureReported)
    }
}
