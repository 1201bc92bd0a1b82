//! The to-do list.
//!
//! Tasks keep insertion order. The pending and completed views are stable
//! filters over that order, so moving a task between them never reshuffles
//! its neighbours.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create a pending task with a fresh id.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTaskText`] if `text` is blank.
    pub fn new(text: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            text: clean_text(text)?,
            completed: false,
        })
    }
}

/// Outcome of [`TaskList::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Completed(Task),
    Reopened(Task),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Pending tasks followed by completed ones; the order the shell lists them.
    pub fn display_order(&self) -> Vec<&Task> {
        let mut out = self.pending();
        out.extend(self.completed());
        out
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new pending task.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTaskText`] if `text` is blank.
    pub fn add(&mut self, text: &str) -> Result<&Task, ValidationError> {
        let task = Task::new(text)?;
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Replace a task's text.
    ///
    /// # Errors
    /// Returns an error if the text is blank or the id is unknown.
    pub fn edit(&mut self, id: &str, text: &str) -> Result<(), ValidationError> {
        let text = clean_text(text)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask(id.to_string()))?;
        task.text = text;
        Ok(())
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Flip a task's completion flag.
    pub fn toggle(&mut self, id: &str) -> Option<Toggle> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let snapshot = task.clone();
        Some(if snapshot.completed {
            Toggle::Completed(snapshot)
        } else {
            Toggle::Reopened(snapshot)
        })
    }
}

fn clean_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTaskText);
    }
    Ok(trimmed.to_string())
}
