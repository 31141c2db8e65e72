//! Manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Task, TaskDraft, TaskStatus};
use crate::store::StoreError;

/// Errors from manager operations
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Channel error")]
    ChannelError,
}

impl From<StoreError> for TaskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Response from manager operations
pub type TaskResponse<T> = Result<T, TaskError>;

/// Commands sent to the manager actor
#[derive(Debug)]
pub enum TaskCommand {
    Create {
        draft: TaskDraft,
        reply: oneshot::Sender<TaskResponse<Task>>,
    },
    Get {
        id: String,
        reply: oneshot::Sender<TaskResponse<Option<Task>>>,
    },
    List {
        status_filter: Option<TaskStatus>,
        reply: oneshot::Sender<TaskResponse<Vec<Task>>>,
    },
    SetStatus {
        id: String,
        status: TaskStatus,
        reply: oneshot::Sender<TaskResponse<()>>,
    },
    Cancel {
        id: String,
        reply: oneshot::Sender<TaskResponse<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<TaskResponse<Vec<Task>>>,
    },
    Shutdown,
}
