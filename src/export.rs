//! JSON export of task snapshots
//!
//! Writes a pretty-printed JSON array of task objects. Serde handles the
//! field shape: status as a string, timestamps as ISO-8601.

use eyre::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::Task;

/// Write a task snapshot to `path` as a JSON array
pub fn export_tasks(path: impl AsRef<Path>, tasks: &[Task]) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).context(format!("Failed to create export file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, tasks).context("Failed to serialize tasks")?;
    info!(count = tasks.len(), path = %path.display(), "Exported tasks");
    Ok(())
}
