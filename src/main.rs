//! TaskTrack - in-memory task tracker demo
//!
//! CLI entry point: seeds sample tasks, processes them concurrently,
//! prints statistics, and exports the snapshot.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use tasktrack::cli::{Cli, Command, OutputFormat};
use tasktrack::config::Config;
use tasktrack::domain::TaskDraft;
use tasktrack::state::TaskManager;
use tasktrack::stats::TaskStats;

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        delay_ms = config.processing.delay_ms,
        failure_threshold = config.processing.failure_threshold,
        "TaskTrack loaded config"
    );

    match cli.command {
        Some(Command::Run { export, format }) => cmd_run(&config, export, format).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// The sample workload: four tasks with mixed priorities
fn sample_drafts() -> Vec<TaskDraft> {
    vec![
        TaskDraft::new("Setup environment", "Install required dependencies").with_priority(1),
        TaskDraft::new("Write documentation", "Create comprehensive docs").with_priority(2),
        TaskDraft::new("Run tests", "Execute test suite").with_priority(1),
        TaskDraft::new("Deploy application", "Deploy to production").with_priority(3),
    ]
}

/// Seed sample tasks, process them concurrently, report and export
async fn cmd_run(config: &Config, export: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let manager = TaskManager::spawn(config.processing.clone());

    // Seed the sample workload
    let mut ids = Vec::new();
    for draft in sample_drafts() {
        let task = manager.create_task(draft).await?;
        println!("{} Created {} ({})", "✓".green(), task.id.cyan(), task.title);
        ids.push(task.id);
    }

    // Process everything concurrently, awaiting the outcomes jointly
    println!();
    println!("Processing {} tasks concurrently...", ids.len());
    let outcomes = manager.process_all(&ids).await;
    for (id, ok) in ids.iter().zip(&outcomes) {
        if *ok {
            println!("  {} {} completed", "✓".green(), id.cyan());
        } else {
            println!("  {} {} failed", "✗".red(), id.cyan());
        }
    }

    // Statistics
    println!();
    let stats = manager.stats().await?;
    print_stats(&stats, &format)?;

    // Export the snapshot
    let path = export.unwrap_or_else(|| config.export.path.clone());
    let count = manager.export_tasks(&path).await?;
    println!();
    println!("{} Exported {} tasks to {}", "✓".green(), count, path.display());

    manager.shutdown().await?;
    Ok(())
}

/// Print statistics in the requested format
fn print_stats(stats: &TaskStats, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
        OutputFormat::Text => {
            println!("Task Statistics");
            println!("---------------");
            println!("Total tasks: {}", stats.total);
            println!("By status:");
            for (status, count) in &stats.by_status {
                println!("  {:12} {}", status, count);
            }
            println!("By priority:");
            for (bucket, count) in &stats.by_priority {
                println!("  {:12} {}", bucket, count);
            }
            println!("Average age: {} hours", stats.avg_age_hours);
        }
    }

    Ok(())
}
