//! # style-worker
//!
//! Serializes style-transfer requests onto one dedicated worker thread.
//!
//! - [`TaskQueue`]: cloneable producer used from the async bot; [`TaskQueue::submit`] returns a
//!   [`Submission`] whose `completion` receiver resolves with the [`TaskOutcome`].
//! - [`Worker`]: the single consumer; runs each [`Task`] through an [`InferenceEngine`] in FIFO order.
//! - [`ScriptInference`]: engine that shells out to the pretrained model scripts.

pub mod engine;
pub mod error;
pub mod task;
pub mod worker;

pub use engine::{InferenceEngine, ScriptConfig, ScriptInference};
pub use error::{InferenceError, QueueError};
pub use task::{CompletionHandle, GanVariant, Task, TaskId, TaskInputs, TaskKind, TaskOutcome};
pub use worker::{Submission, TaskQueue, Worker};
