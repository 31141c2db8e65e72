//! TaskTrack - in-memory task tracker with simulated async processing
//!
//! A manager actor exclusively owns a map of task records and the
//! counter used to mint sequential identifiers. Callers hold cheap
//! cloneable handles; processing operations run concurrently and only
//! suspend at their simulated-delay point, with all mutation serialized
//! through the actor.
//!
//! # Modules
//!
//! - [`domain`] - Task, TaskDraft, TaskStatus, and ID minting
//! - [`store`] - the in-memory collection behind the actor
//! - [`state`] - the TaskManager handle and actor loop
//! - [`stats`] - aggregated statistics over snapshots
//! - [`export`] - JSON file export
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod state;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use config::{Config, ExportConfig, ProcessingConfig};
pub use domain::{DEFAULT_PRIORITY, Task, TaskDraft, TaskStatus, format_id, parse_counter};
pub use state::{TaskCommand, TaskError, TaskManager, TaskResponse};
pub use stats::TaskStats;
pub use store::{StoreError, TaskStore};
