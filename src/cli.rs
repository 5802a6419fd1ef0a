use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;

/// Task file used when neither --db nor TASK_CLI_DB is given.
pub const DEFAULT_DB_FILE: &str = "tasks.json";

/// Simple, file-backed task tracker CLI.
/// Storage defaults to ./tasks.json, TASK_CLI_DB, or a path passed via --db.
#[derive(Parser, Debug)]
#[command(name = "task-cli", version, about = "Track tasks in a local JSON file")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true, env = "TASK_CLI_DB", default_value = DEFAULT_DB_FILE)]
    pub db: PathBuf,

    /// Log more to stderr (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
