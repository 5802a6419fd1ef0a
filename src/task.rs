//! Task data structure.
//!
//! This module defines the `Task` record, the only entity kept in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// A single trackable unit of work.
///
/// Field order here is the key order written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub description: String,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a fresh `todo` task stamped with the given time.
    pub fn new(id: u64, description: String, now: DateTime<Utc>) -> Self {
        Task {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }
}
