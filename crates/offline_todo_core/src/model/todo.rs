//! Todo record and text rules.
//!
//! # Invariants
//! - `id` is the creation timestamp in epoch milliseconds and never changes.
//! - Stored `text` is trimmed and non-empty.
//! - Two todos collide when their texts match case-insensitively.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Creation timestamp (epoch ms) doubling as the stable identifier.
pub type TodoId = i64;

/// One user-entered task. Serialized as `{id, text, completed}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo from already-normalized text.
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Whether `other` names the same task, ignoring case.
    pub fn matches_text(&self, other: &str) -> bool {
        text_key(&self.text) == text_key(other)
    }
}

/// Validation failures for todo text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyText,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "Todo text cannot be empty!"),
        }
    }
}

impl Error for TodoValidationError {}

/// Trims raw input and rejects blank text.
pub fn normalize_todo_text(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Comparison key used for duplicate detection.
pub fn text_key(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_todo_text, text_key, Todo, TodoValidationError};

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_todo_text("  Buy milk \n").unwrap(), "Buy milk");
        assert_eq!(
            normalize_todo_text(" \t ").unwrap_err(),
            TodoValidationError::EmptyText
        );
    }

    #[test]
    fn matches_text_ignores_case_and_padding() {
        let todo = Todo::new(1, "Buy Milk");
        assert!(todo.matches_text("  buy milk"));
        assert!(!todo.matches_text("buy milk!"));
        assert_eq!(text_key("ÄPFEL"), "äpfel");
    }
}
