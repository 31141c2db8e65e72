//! In-memory task store
//!
//! Owns the task map and the ID counter. The store is held exclusively
//! by the manager actor; nothing else mutates it.

use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Task, TaskDraft, TaskStatus, format_id, parse_counter};

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    NotFound(String),
}

/// The in-memory task collection plus the ID counter
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: HashMap<String, Task>,
    counter: u64,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new task from a draft
    ///
    /// Mints the next sequential ID, stores the record with default
    /// status pending, and returns it.
    pub fn create(&mut self, draft: TaskDraft) -> Task {
        self.counter += 1;
        let task = Task::from_draft(format_id(self.counter), draft);
        self.tasks.insert(task.id.clone(), task.clone());
        info!(id = %task.id, title = %task.title, "Created task");
        task
    }

    /// Get a task by ID
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Update a task's status, refreshing its update timestamp
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.set_status(status);
        info!(%id, %status, "Task status updated");
        Ok(task.clone())
    }

    /// List tasks, optionally filtered by status
    ///
    /// Results are stably sorted by (priority ascending, creation time
    /// ascending).
    pub fn list(&self, status_filter: Option<TaskStatus>) -> Vec<Task> {
        debug!(?status_filter, count = self.tasks.len(), "list: called");
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| status_filter.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.priority, t.created_at));
        tasks
    }

    /// Snapshot of all tasks in identifier (insertion) order
    pub fn snapshot(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(|t| parse_counter(&t.id).unwrap_or(u64::MAX));
        tasks
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
