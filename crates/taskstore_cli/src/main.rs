//! Command-line facade over `taskstore_core`.
//!
//! # Responsibility
//! - Map subcommands onto task service calls and print JSON results.
//! - Flush background snapshot writes before the process exits.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::num::NonZeroU64;
use std::path::PathBuf;
use taskstore_core::{
    init_logging, AppConfig, LoadPolicy, TaskId, TaskListQuery, TaskService,
};

#[derive(Parser)]
#[command(name = "taskstore")]
#[command(version = taskstore_core::core_version())]
#[command(about = "Manage tasks stored in a JSON snapshot file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot file (overrides TASKS_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Refuse to start when the snapshot file cannot be loaded
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task
    Create {
        /// Task title (3-100 characters)
        title: String,
    },

    /// Show one task
    Get {
        /// Task ID
        id: NonZeroU64,
    },

    /// Replace a task's title and done flag
    Update {
        /// Task ID
        id: NonZeroU64,

        /// New title (3-100 characters)
        title: String,

        /// Mark the task as done
        #[arg(long)]
        done: bool,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: NonZeroU64,
    },

    /// List tasks page by page
    List {
        /// Page number; values below 1 mean the first page
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Page size; values below 1 mean 10, capped at 100
        #[arg(long, default_value_t = 10)]
        limit: i64,

        /// Only tasks with this done flag
        #[arg(long)]
        done: Option<bool>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid environment configuration")?;
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let policy = if cli.strict {
        LoadPolicy::Abort
    } else {
        LoadPolicy::Continue
    };
    let service = TaskService::open(&config.data_file, policy).with_context(|| {
        format!("failed to open task store `{}`", config.data_file.display())
    })?;

    let outcome = run(&service, cli.command);
    service.flush();
    outcome
}

fn run(service: &TaskService, command: Commands) -> Result<()> {
    match command {
        Commands::Create { title } => print_json(&service.create_task(&title)?),
        Commands::Get { id } => print_json(&service.get_task(task_id(id)?)?),
        Commands::Update { id, title, done } => {
            print_json(&service.update_task(task_id(id)?, &title, done)?)
        }
        Commands::Delete { id } => {
            let id = task_id(id)?;
            service.delete_task(id)?;
            println!("deleted {id}");
            Ok(())
        }
        Commands::List { page, limit, done } => {
            print_json(&service.list_tasks(&TaskListQuery::new(page, limit, done)))
        }
    }
}

fn task_id(id: NonZeroU64) -> Result<TaskId> {
    TaskId::try_from(id.get()).context("invalid id: must be positive integer")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
