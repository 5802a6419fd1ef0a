//! Command implementations for the CLI interface.
//!
//! Each handler performs exactly one store operation and prints the outcome
//! as human-readable text on stdout.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::db::*;
use crate::error::CmdError;
use crate::fields::Status;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Task description. All words are joined with single spaces.
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Update a task's description, or its status when the value is
    /// todo | in-progress | done.
    Update {
        /// Task ID.
        id: u64,
        /// New description or status.
        value: String,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// List tasks, optionally only those with the given status.
    List {
        /// Status filter: todo | in-progress | done.
        #[arg(value_enum)]
        status: Option<Status>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run one command against the store.
pub fn run(command: Commands, store: &TaskStore) -> Result<(), CmdError> {
    match command {
        Commands::Add { description } => cmd_add(store, description),
        Commands::Update { id, value } => cmd_update(store, id, value),
        Commands::Delete { id } => cmd_delete(store, id),
        Commands::List { status } => cmd_list(store, status),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Usage line for a subcommand, the same text clap prints for missing arguments.
pub fn usage(name: &str) -> String {
    let mut app = Cli::command();
    app.build();
    app.find_subcommand_mut(name)
        .map(|sub| sub.render_usage().to_string())
        .unwrap_or_default()
}

/// Join description words, rejecting a blank result.
pub fn join_description(words: &[String]) -> Result<String, CmdError> {
    let description = words.join(" ");
    if description.trim().is_empty() {
        return Err(CmdError::Usage(format!(
            "description must not be empty\n\n{}",
            usage("add")
        )));
    }
    Ok(description)
}

/// Route an update value: a status literal updates the status, anything else
/// replaces the description.
pub fn route_update(value: String) -> Result<TaskUpdate, CmdError> {
    if let Some(status) = Status::from_literal(&value) {
        return Ok(TaskUpdate {
            status: Some(status),
            ..Default::default()
        });
    }
    if value.trim().is_empty() {
        return Err(CmdError::Usage(format!(
            "description must not be empty\n\n{}",
            usage("update")
        )));
    }
    Ok(TaskUpdate {
        description: Some(value),
        ..Default::default()
    })
}

/// Add a new task to the store.
pub fn cmd_add(store: &TaskStore, words: Vec<String>) -> Result<(), CmdError> {
    let description = join_description(&words)?;
    let task = store.add(description)?;
    println!("Task added successfully (ID: {})", task.id);
    println!("{}", format_task(&task));
    Ok(())
}

/// Update either the description or the status of a task.
pub fn cmd_update(store: &TaskStore, id: u64, value: String) -> Result<(), CmdError> {
    let update = route_update(value)?;
    let task = store.update(id, update)?;
    println!("Task updated:");
    println!("{}", format_task(&task));
    Ok(())
}

/// Delete a task. Confirms even when no task had that ID.
pub fn cmd_delete(store: &TaskStore, id: u64) -> Result<(), CmdError> {
    store.delete(id)?;
    println!("Task with id {} deleted.", id);
    Ok(())
}

/// List tasks with an optional status filter.
pub fn cmd_list(store: &TaskStore, status: Option<Status>) -> Result<(), CmdError> {
    let tasks = store.list(status)?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    print_table(&tasks);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use tempfile::tempdir;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn description_words_are_joined_with_spaces() {
        assert_eq!(
            join_description(&words(&["Buy", "milk", "and", "eggs"])).unwrap(),
            "Buy milk and eggs"
        );
    }

    #[test]
    fn blank_description_is_usage_error() {
        let err = join_description(&words(&["  ", ""])).unwrap_err();
        assert!(matches!(err, CmdError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn usage_is_rendered_from_the_command_definition() {
        let add = usage("add");
        assert!(add.contains("task-cli add"), "{add}");
        assert!(add.contains("<DESCRIPTION>..."), "{add}");
        let update = usage("update");
        assert!(update.contains("<ID> <VALUE>"), "{update}");

        let err = route_update(String::new()).unwrap_err();
        assert!(err.to_string().ends_with(&update), "{err}");
    }

    #[test]
    fn status_literals_route_to_status() {
        for (literal, status) in [
            ("todo", Status::Todo),
            ("in-progress", Status::InProgress),
            ("done", Status::Done),
        ] {
            let update = route_update(literal.into()).unwrap();
            assert_eq!(update.status, Some(status));
            assert_eq!(update.description, None);
        }
    }

    #[test]
    fn other_values_route_to_description() {
        let update = route_update("Done with it".into()).unwrap();
        assert_eq!(update.description.as_deref(), Some("Done with it"));
        assert_eq!(update.status, None);
        assert!(matches!(route_update(" ".into()), Err(CmdError::Usage(_))));
    }

    #[test]
    fn handlers_drive_the_store() {
        let dir = tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));

        cmd_add(&store, words(&["Write", "docs"])).unwrap();
        cmd_update(&store, 1, "in-progress".into()).unwrap();
        cmd_list(&store, Some(Status::InProgress)).unwrap();

        let task = store.list(None).unwrap().remove(0);
        assert_eq!(task.description, "Write docs");
        assert_eq!(task.status, Status::InProgress);

        let err = cmd_update(&store, 9, "done".into()).unwrap_err();
        assert!(matches!(err, CmdError::Store(StoreError::NotFound(9))));
        assert_eq!(err.exit_code(), 3);

        cmd_delete(&store, 1).unwrap();
        cmd_delete(&store, 1).unwrap();
        assert!(store.list(None).unwrap().is_empty());
    }
}
