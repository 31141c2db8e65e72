//! TaskManager - actor that owns the TaskStore
//!
//! Processes commands via channels so concurrent processing operations
//! never contend on the task map. Simulated work (the delay and the
//! random draw) happens on the caller's side of the channel; only the
//! mutations are serialized through the actor.

use chrono::Utc;
use std::path::Path;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::ProcessingConfig;
use crate::domain::{Task, TaskDraft, TaskStatus};
use crate::export;
use crate::stats::TaskStats;
use crate::store::TaskStore;

use super::messages::{TaskCommand, TaskError, TaskResponse};

/// Handle to send commands to the manager actor
#[derive(Clone)]
pub struct TaskManager {
    tx: mpsc::Sender<TaskCommand>,
    processing: ProcessingConfig,
}

impl TaskManager {
    /// Spawn a new manager actor with an empty store
    pub fn spawn(processing: ProcessingConfig) -> Self {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(TaskStore::new(), rx));
        info!("TaskManager spawned");
        Self { tx, processing }
    }

    /// Create a new task from a draft
    pub async fn create_task(&self, draft: TaskDraft) -> TaskResponse<Task> {
        debug!(title = %draft.title, "create_task: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::Create { draft, reply: reply_tx })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: &str) -> TaskResponse<Option<Task>> {
        debug!(%id, "get_task: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::Get {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Get a task by ID, returning an error if not found
    pub async fn get_task_required(&self, id: &str) -> Result<Task, TaskError> {
        debug!(%id, "get_task_required: called");
        self.get_task(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    /// List tasks, optionally filtered by status
    ///
    /// Results are sorted by (priority ascending, creation time ascending).
    pub async fn list_tasks(&self, status_filter: Option<TaskStatus>) -> TaskResponse<Vec<Task>> {
        debug!(?status_filter, "list_tasks: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::List {
                status_filter,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Update a task's status
    pub async fn set_status(&self, id: &str, status: TaskStatus) -> TaskResponse<()> {
        debug!(%id, %status, "set_status: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::SetStatus {
                id: id.to_string(),
                status,
                reply: reply_tx,
            })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Cancel a task (rejected once the task is terminal)
    pub async fn cancel_task(&self, id: &str) -> TaskResponse<()> {
        debug!(%id, "cancel_task: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::Cancel {
                id: id.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Snapshot of all tasks in identifier order
    pub async fn snapshot(&self) -> TaskResponse<Vec<Task>> {
        debug!("snapshot: called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TaskCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| TaskError::ChannelError)?;
        reply_rx.await.map_err(|_| TaskError::ChannelError)?
    }

    /// Shutdown the manager actor
    pub async fn shutdown(&self) -> Result<(), TaskError> {
        debug!("shutdown: called");
        self.tx
            .send(TaskCommand::Shutdown)
            .await
            .map_err(|_| TaskError::ChannelError)
    }

    // === Processing ===

    /// Process a task: in_progress, simulated delay, then completed or
    /// failed depending on a random draw
    ///
    /// Never returns an error to the caller. Unknown IDs and internal
    /// failures are logged and reported as `false`; a known task always
    /// ends terminal, never in_progress.
    pub async fn process_task(&self, id: &str) -> bool {
        debug!(%id, "process_task: called");
        match self.try_process(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%id, error = %e, "Task processing failed");
                let _ = self.set_status(id, TaskStatus::Failed).await;
                false
            }
        }
    }

    async fn try_process(&self, id: &str) -> Result<bool, TaskError> {
        if self.get_task(id).await?.is_none() {
            error!(%id, "Task not found");
            return Ok(false);
        }

        self.set_status(id, TaskStatus::InProgress).await?;

        // Simulated work
        tokio::time::sleep(self.processing.delay()).await;

        // A uniform draw above the threshold is the synthetic failure path
        let draw: f64 = rand::random();
        if draw > self.processing.failure_threshold {
            warn!(%id, draw, "Synthetic processing failure");
            self.set_status(id, TaskStatus::Failed).await?;
            return Ok(false);
        }

        self.set_status(id, TaskStatus::Completed).await?;
        Ok(true)
    }

    /// Process tasks concurrently and await all outcomes jointly
    ///
    /// Outcomes are returned in the same order as `ids`.
    pub async fn process_all(&self, ids: &[String]) -> Vec<bool> {
        debug!(count = ids.len(), "process_all: called");
        let tasks: Vec<_> = ids.iter().map(|id| self.process_task(id)).collect();
        futures::future::join_all(tasks).await
    }

    // === Convenience methods ===

    /// Tally statistics over the current snapshot
    pub async fn stats(&self) -> TaskResponse<TaskStats> {
        debug!("stats: called");
        let tasks = self.snapshot().await?;
        Ok(TaskStats::compute(&tasks, Utc::now()))
    }

    /// Export the current snapshot to a JSON file, returning the count
    pub async fn export_tasks(&self, path: impl AsRef<Path>) -> eyre::Result<usize> {
        debug!(path = %path.as_ref().display(), "export_tasks: called");
        let tasks = self.snapshot().await?;
        export::export_tasks(path, &tasks)?;
        Ok(tasks.len())
    }
}

/// The actor loop that owns the store and processes commands
async fn actor_loop(mut store: TaskStore, mut rx: mpsc::Receiver<TaskCommand>) {
    debug!("TaskManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            TaskCommand::Create { draft, reply } => {
                debug!(title = %draft.title, "actor_loop: Create command");
                let task = store.create(draft);
                let _ = reply.send(Ok(task));
            }

            TaskCommand::Get { id, reply } => {
                debug!(%id, "actor_loop: Get command");
                let _ = reply.send(Ok(store.get(&id).cloned()));
            }

            TaskCommand::List { status_filter, reply } => {
                debug!(?status_filter, "actor_loop: List command");
                let _ = reply.send(Ok(store.list(status_filter)));
            }

            TaskCommand::SetStatus { id, status, reply } => {
                debug!(%id, %status, "actor_loop: SetStatus command");
                let result = store.set_status(&id, status).map(|_| ()).map_err(TaskError::from);
                let _ = reply.send(result);
            }

            TaskCommand::Cancel { id, reply } => {
                debug!(%id, "actor_loop: Cancel command");
                let result = match store.get(&id) {
                    None => Err(TaskError::NotFound(id.clone())),
                    Some(task) if task.is_terminal() => Err(TaskError::InvalidTransition(format!(
                        "Cannot cancel terminal task {}",
                        id
                    ))),
                    Some(_) => store
                        .set_status(&id, TaskStatus::Cancelled)
                        .map(|_| ())
                        .map_err(TaskError::from),
                };
                let _ = reply.send(result);
            }

            TaskCommand::Snapshot { reply } => {
                debug!("actor_loop: Snapshot command");
                let _ = reply.send(Ok(store.snapshot()));
            }

            TaskCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("TaskManager shutting down");
                break;
            }
        }
    }

    debug!("TaskManager actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> ProcessingConfig {
        ProcessingConfig {
            delay_ms: 5,
            failure_threshold: 1.0,
        }
    }

    #[tokio::test]
    async fn test_manager_crud() {
        let manager = TaskManager::spawn(fast_config());

        // Create
        let task = manager
            .create_task(TaskDraft::new("Test", "Description"))
            .await
            .unwrap();
        assert_eq!(task.id, "TASK-0001");
        assert_eq!(task.status, TaskStatus::Pending);

        // Get
        let retrieved = manager.get_task(&task.id).await.unwrap();
        assert_eq!(retrieved.unwrap().title, "Test");

        // Update
        manager.set_status(&task.id, TaskStatus::InProgress).await.unwrap();
        let updated = manager.get_task_required(&task.id).await.unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        // List
        let tasks = manager.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 1);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let manager = TaskManager::spawn(fast_config());

        assert!(manager.get_task("TASK-0042").await.unwrap().is_none());
        let result = manager.get_task_required("TASK-0042").await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_set_status_nonexistent() {
        let manager = TaskManager::spawn(fast_config());

        let result = manager.set_status("TASK-0042", TaskStatus::Completed).await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));

        manager.shutdown().await.unwrap();
    }

    // === Processing ===

    #[tokio::test]
    async fn test_process_task_completes() {
        // Threshold of 1.0 cannot be exceeded by a draw in [0, 1)
        let manager = TaskManager::spawn(fast_config());
        let task = manager.create_task(TaskDraft::new("Work", "d")).await.unwrap();

        assert!(manager.process_task(&task.id).await);
        let processed = manager.get_task_required(&task.id).await.unwrap();
        assert_eq!(processed.status, TaskStatus::Completed);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_process_task_fails() {
        // Threshold below the draw range forces the failure path
        let manager = TaskManager::spawn(ProcessingConfig {
            delay_ms: 5,
            failure_threshold: -1.0,
        });
        let task = manager.create_task(TaskDraft::new("Work", "d")).await.unwrap();

        assert!(!manager.process_task(&task.id).await);
        let processed = manager.get_task_required(&task.id).await.unwrap();
        assert_eq!(processed.status, TaskStatus::Failed);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_process_nonexistent_returns_false() {
        let manager = TaskManager::spawn(fast_config());

        assert!(!manager.process_task("TASK-0042").await);
        // Nothing was created as a side effect
        assert!(manager.snapshot().await.unwrap().is_empty());

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_process_all_joint() {
        let manager = TaskManager::spawn(fast_config());
        let mut ids = Vec::new();
        for n in 0..4 {
            let task = manager
                .create_task(TaskDraft::new(format!("Task {}", n), "d"))
                .await
                .unwrap();
            ids.push(task.id);
        }

        let outcomes = manager.process_all(&ids).await;
        assert_eq!(outcomes, vec![true; 4]);

        for id in &ids {
            let task = manager.get_task_required(id).await.unwrap();
            assert!(task.is_terminal());
        }

        manager.shutdown().await.unwrap();
    }

    // === Cancel ===

    #[tokio::test]
    async fn test_cancel_pending_task() {
        let manager = TaskManager::spawn(fast_config());
        let task = manager.create_task(TaskDraft::new("Drop me", "d")).await.unwrap();

        manager.cancel_task(&task.id).await.unwrap();
        let cancelled = manager.get_task_required(&task.id).await.unwrap();
        assert_eq!(cancelled.status, TaskStatus::Cancelled);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_terminal_task_rejected() {
        let manager = TaskManager::spawn(fast_config());
        let task = manager.create_task(TaskDraft::new("Done", "d")).await.unwrap();
        manager.set_status(&task.id, TaskStatus::Completed).await.unwrap();

        let result = manager.cancel_task(&task.id).await;
        assert!(matches!(result, Err(TaskError::InvalidTransition(_))));

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_nonexistent_rejected() {
        let manager = TaskManager::spawn(fast_config());

        let result = manager.cancel_task("TASK-0042").await;
        assert!(matches!(result, Err(TaskError::NotFound(_))));

        manager.shutdown().await.unwrap();
    }

    // === Stats and export ===

    #[tokio::test]
    async fn test_stats_totals() {
        let manager = TaskManager::spawn(fast_config());
        for n in 0u8..3 {
            manager
                .create_task(TaskDraft::new(format!("Task {}", n), "d").with_priority(n + 1))
                .await
                .unwrap();
        }

        let stats = manager.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.get("pending"), Some(&3));
        assert_eq!(stats.by_priority.len(), 3);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_export_tasks() {
        let manager = TaskManager::spawn(fast_config());
        manager.create_task(TaskDraft::new("Persist", "d")).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let count = manager.export_tasks(&path).await.unwrap();

        assert_eq!(count, 1);
        assert!(path.exists());

        manager.shutdown().await.unwrap();
    }
}
