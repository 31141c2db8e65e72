//! Aggregated task statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::Task;

/// Aggregated counts over a task snapshot
#[derive(Debug, Default, Serialize)]
pub struct TaskStats {
    /// Total number of tasks
    pub total: usize,

    /// Count per status string
    pub by_status: BTreeMap<String, usize>,

    /// Count per priority bucket (`priority_{n}`)
    pub by_priority: BTreeMap<String, usize>,

    /// Mean record age in hours, rounded to two decimals
    pub avg_age_hours: f64,
}

impl TaskStats {
    /// Tally statistics for a snapshot, measuring ages against `now`
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };

        for task in tasks {
            *stats.by_status.entry(task.status.to_string()).or_insert(0) += 1;
            *stats
                .by_priority
                .entry(format!("priority_{}", task.priority))
                .or_insert(0) += 1;
        }

        if !tasks.is_empty() {
            let total_secs: f64 = tasks
                .iter()
                .map(|t| (now - t.created_at).num_milliseconds() as f64 / 1000.0)
                .sum();
            let hours = total_secs / tasks.len() as f64 / 3600.0;
            stats.avg_age_hours = (hours * 100.0).round() / 100.0;
        }

        stats
    }
}
