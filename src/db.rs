//! Task store and display helpers.
//!
//! `Database` is the in-memory ordered task list that maps one-to-one onto the
//! JSON array on disk. `TaskStore` owns the backing path and runs every
//! operation as a full load, an in-memory mutation and a full save.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::fields::Status;
use crate::task::Task;

/// In-memory copy of the store, serialised as a bare JSON array.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load the database from a JSON file. A missing file is an empty database.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let buf = match fs::read_to_string(path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "task file missing, using empty store");
                return Ok(Database::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let db: Database = serde_json::from_str(&buf).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), count = db.tasks.len(), "loaded tasks");
        Ok(db)
    }

    /// Save the database as indented JSON using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut data = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut data, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser).map_err(|e| io_err(e.into()))?;
        data.push(b'\n');

        let tmp = temp_path(path);
        let written = File::create(&tmp).and_then(|mut f| {
            f.write_all(&data)?;
            f.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        debug!(path = %path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Generate the next task ID: 1 for an empty store, otherwise the highest ID plus one.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max.checked_add(1).ok_or(StoreError::IdsExhausted(max))
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove every task with the given ID. Returns whether anything was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}

/// Sibling path used for the atomic write, e.g. `tasks.json` -> `tasks.json.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("tasks.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Fields to change on an existing task.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub status: Option<Status>,
}

/// Handle on a task file. Every call reads and rewrites the whole file; there is
/// no locking, so concurrent processes race with last-write-wins.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Database, StoreError> {
        Database::load(&self.path)
    }

    pub fn save(&self, db: &Database) -> Result<(), StoreError> {
        db.save(&self.path)
    }

    /// Append a new `todo` task and return it.
    pub fn add(&self, description: String) -> Result<Task, StoreError> {
        let mut db = self.load()?;
        let task = Task::new(db.next_id()?, description, Utc::now());
        db.tasks.push(task.clone());
        self.save(&db)?;
        info!(id = task.id, "task added");
        Ok(task)
    }

    /// Apply `update` to the task with `id`.
    ///
    /// An empty description is ignored. `updated_at` moves only when a field
    /// was applied, and the file is left untouched when nothing was.
    pub fn update(&self, id: u64, update: TaskUpdate) -> Result<Task, StoreError> {
        let mut db = self.load()?;
        let Some(task) = db.get_mut(id) else {
            debug!(id, "task not found");
            return Err(StoreError::NotFound(id));
        };

        let mut applied = false;
        if let Some(description) = update.description.filter(|d| !d.is_empty()) {
            task.description = description;
            applied = true;
        }
        if let Some(status) = update.status {
            task.status = status;
            applied = true;
        }
        if !applied {
            return Ok(task.clone());
        }

        task.updated_at = Utc::now();
        let task = task.clone();
        self.save(&db)?;
        info!(id, status = %task.status, "task updated");
        Ok(task)
    }

    /// Remove the task with `id`. Deleting an unknown ID is not an error.
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut db = self.load()?;
        let removed = db.remove(id);
        self.save(&db)?;
        if removed {
            info!(id, "task deleted");
        } else {
            debug!(id, "delete matched no task");
        }
        Ok(removed)
    }

    /// Tasks with the given status, or all of them, in insertion order.
    pub fn list(&self, status: Option<Status>) -> Result<Vec<Task>, StoreError> {
        let db = self.load()?;
        Ok(db
            .tasks
            .into_iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect())
    }
}

/// Format a timestamp in local time for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// One-line summary of a task.
pub fn format_task(t: &Task) -> String {
    format!(
        "[{}] {} ({}) created {}, updated {}",
        t.id,
        t.description,
        t.status,
        format_timestamp(t.created_at),
        format_timestamp(t.updated_at)
    )
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<12} {:<17} {:<17} {}",
        "ID", "Status", "Created", "Updated", "Description"
    );
    for t in tasks {
        println!(
            "{:<5} {:<12} {:<17} {:<17} {}",
            t.id,
            t.status.as_str(),
            format_timestamp(t.created_at),
            format_timestamp(t.updated_at),
            truncate(&t.description, 60)
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
