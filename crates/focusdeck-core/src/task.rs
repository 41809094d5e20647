//! Dashboard todo items.
//!
//! Plain list mutation, no invariants beyond that; the scheduler never
//! touches tasks. Stored in the same SQLite database as sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            done: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_open() {
        let task = Task::new("Finish project proposal");
        assert!(!task.done);
        assert_eq!(task.title, "Finish project proposal");
        assert!(!task.id.is_empty());
    }
}
