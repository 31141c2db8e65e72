//! Task record and status types
//!
//! Task is the unit of work tracked by the manager. Every status
//! transition refreshes `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default priority assigned to new tasks (lower sorts first)
pub const DEFAULT_PRIORITY: u8 = 1;

/// Lifecycle states for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state, not yet picked up
    #[default]
    Pending,
    /// Currently being processed
    InProgress,
    /// Finished successfully
    Completed,
    /// Processing failed
    Failed,
    /// Cancelled before completion
    Cancelled,
}

impl TaskStatus {
    /// Check if the status is terminal (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Input to task creation
///
/// The store mints the ID and timestamps; everything else comes from
/// the draft.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Human-readable title
    pub title: String,

    /// Longer description of the work
    pub description: String,

    /// Priority for list ordering
    pub priority: u8,

    /// Auxiliary metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl TaskDraft {
    /// Create a draft with default priority and no metadata
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: DEFAULT_PRIORITY,
            metadata: HashMap::new(),
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A tracked task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (`TASK-0001` style, minted by the store)
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Longer description of the work
    pub description: String,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Priority for list ordering (lower sorts first)
    pub priority: u8,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Auxiliary metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Task {
    /// Construct a task from a draft with a minted ID
    pub fn from_draft(id: impl Into<String>, draft: TaskDraft) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Pending,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
            metadata: draft.metadata,
        }
    }

    /// Update the status and refresh the update timestamp
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
