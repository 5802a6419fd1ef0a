//! # task-cli
//!
//! A minimal command-line task tracker. Tasks live in a single JSON array file
//! (`./tasks.json` unless `--db` or `TASK_CLI_DB` says otherwise) which is read
//! and rewritten in full on every command.
//!
//! ```bash
//! task-cli add Buy groceries
//! task-cli update 1 in-progress
//! task-cli update 1 "Buy groceries and cook dinner"
//! task-cli list done
//! task-cli delete 1
//! ```
//!
//! Outcomes, including unknown IDs and unknown commands, are printed on stdout;
//! only storage failures and usage errors go to stderr.
//!
//! Exit status: 0 on success, 1 when the task file cannot be read or written,
//! 2 for usage errors, 3 when a task ID does not exist.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, Level};

pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod task;

use cli::Cli;
use db::TaskStore;
use error::{CmdError, StoreError};

const UNKNOWN_COMMAND: &str = "Unknown command. Use add, update, delete, or list.";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::InvalidSubcommand
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                println!("{UNKNOWN_COMMAND}");
                return ExitCode::from(2);
            }
            _ => e.exit(),
        },
    };

    init_logging(cli.verbose);

    let store = TaskStore::new(cli.db);
    debug!(path = %store.path().display(), "using task file");

    match cmd::run(cli.command, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                CmdError::Store(StoreError::NotFound(_)) => println!("{e}"),
                _ => eprintln!("error: {e}"),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Install a stderr fmt subscriber so stdout carries only command output.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}
