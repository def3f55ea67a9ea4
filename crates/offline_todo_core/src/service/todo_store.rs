//! Todo list use-cases over the key-value store.
//!
//! # Responsibility
//! - Own the in-memory todo list of an authenticated session.
//! - Persist the full list under [`TODOS_KEY`] after every mutation.
//!
//! # Invariants
//! - The list is written before the in-memory copy changes; a failed write
//!   leaves both untouched.
//! - Ids are unique and non-decreasing in creation order.
//! - No two todos share a text case-insensitively.
//! - Malformed persisted data loads as an empty list; a failed read is an
//!   error, never an empty list.

use crate::clock::{Clock, SystemClock};
use crate::error::ErrorKind;
use crate::model::todo::{normalize_todo_text, text_key, Todo, TodoId, TodoValidationError};
use crate::store::{KeyValueStore, KvError, KvResult, TODOS_KEY};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TodoResult<T> = Result<T, TodoError>;

#[derive(Debug)]
pub enum TodoError {
    Validation(TodoValidationError),
    /// Another todo already carries this text (case-insensitive).
    Duplicate(String),
    NotFound(TodoId),
    Storage(KvError),
    Encode(serde_json::Error),
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::NotFound(_) => ErrorKind::State,
            Self::Storage(_) | Self::Encode(_) => ErrorKind::Storage,
        }
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(_) => write!(f, "This todo already exists!"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode todo list: {err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Duplicate(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<TodoValidationError> for TodoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for TodoError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Reads the persisted list.
///
/// A missing key or malformed JSON yields an empty list. Entries that break
/// the list invariants (blank text, repeated id, repeated text) are dropped,
/// keeping the first occurrence.
///
/// # Errors
/// - `KvError` when the backend read fails; the caller must not treat the
///   list as empty, or the next write would overwrite the stored todos.
pub fn load_todos<S: KeyValueStore>(store: &S) -> KvResult<Vec<Todo>> {
    let raw = match store.get(TODOS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(Vec::new()),
        Err(err) => {
            error!(
                "event=todos_load module=todo_store status=error error_code=store_read_failed error={}",
                err
            );
            return Err(err);
        }
    };

    match serde_json::from_str::<Vec<Todo>>(&raw) {
        Ok(parsed) => {
            let total = parsed.len();
            let todos = drop_invalid_entries(parsed);
            if todos.len() != total {
                warn!(
                    "event=todos_load module=todo_store status=repaired error_code=invalid_entries dropped={}",
                    total - todos.len()
                );
            }
            info!(
                "event=todos_load module=todo_store status=ok count={}",
                todos.len()
            );
            Ok(todos)
        }
        Err(err) => {
            warn!(
                "event=todos_load module=todo_store status=fallback error_code=malformed_json line={} column={}",
                err.line(),
                err.column()
            );
            Ok(Vec::new())
        }
    }
}

fn drop_invalid_entries(parsed: Vec<Todo>) -> Vec<Todo> {
    let mut ids = BTreeSet::new();
    let mut keys = BTreeSet::new();
    parsed
        .into_iter()
        .filter(|todo| {
            let key = text_key(&todo.text);
            !key.is_empty() && ids.insert(todo.id) && keys.insert(key)
        })
        .collect()
}

/// Serializes and writes the full list under [`TODOS_KEY`].
pub fn save_todos<S: KeyValueStore>(store: &S, todos: &[Todo]) -> TodoResult<()> {
    let encoded = serde_json::to_string(todos).map_err(TodoError::Encode)?;
    store.set(TODOS_KEY, &encoded)?;
    Ok(())
}

/// In-memory todo list bound to a key-value store.
pub struct TodoStore<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    todos: Vec<Todo>,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Starts an empty list on the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    /// Loads the persisted list on the system clock.
    pub fn load(store: S) -> KvResult<Self> {
        Self::load_with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> TodoStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            todos: Vec::new(),
        }
    }

    pub fn load_with_clock(store: S, clock: C) -> KvResult<Self> {
        let todos = load_todos(&store)?;
        Ok(Self {
            store,
            clock,
            todos,
        })
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// A failed read keeps the current list.
    pub fn reload(&mut self) -> KvResult<()> {
        self.todos = load_todos(&self.store)?;
        Ok(())
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Number of todos marked completed.
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Appends a new open todo.
    ///
    /// # Errors
    /// - `Validation` when `text` is blank after trimming.
    /// - `Duplicate` when any todo has the same text ignoring case.
    pub fn add(&mut self, text: &str) -> TodoResult<Todo> {
        let text = normalize_todo_text(text)?;
        if self.todos.iter().any(|todo| todo.matches_text(&text)) {
            info!("event=todo_add module=todo_store status=rejected error_code=duplicate");
            return Err(TodoError::Duplicate(text));
        }

        let todo = Todo::new(self.next_id(), text);
        let mut next = self.todos.clone();
        next.push(todo.clone());
        self.commit(next)?;

        info!(
            "event=todo_add module=todo_store status=ok id={} count={}",
            todo.id,
            self.todos.len()
        );
        Ok(todo)
    }

    /// Flips `completed` and returns the new value.
    ///
    /// Unknown ids are a no-op returning `Ok(None)` without a write.
    pub fn toggle(&mut self, id: TodoId) -> TodoResult<Option<bool>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut next = self.todos.clone();
        next[index].completed = !next[index].completed;
        let completed = next[index].completed;
        self.commit(next)?;

        info!(
            "event=todo_toggle module=todo_store status=ok id={} completed={}",
            id, completed
        );
        Ok(Some(completed))
    }

    /// Replaces the text of one todo.
    ///
    /// # Errors
    /// - `Validation` when `new_text` is blank after trimming.
    /// - `Duplicate` when a different todo has the same text ignoring case.
    /// - `NotFound` when `id` is unknown.
    pub fn edit(&mut self, id: TodoId, new_text: &str) -> TodoResult<Todo> {
        let text = normalize_todo_text(new_text)?;
        if self
            .todos
            .iter()
            .any(|todo| todo.id != id && todo.matches_text(&text))
        {
            info!(
                "event=todo_edit module=todo_store status=rejected id={} error_code=duplicate",
                id
            );
            return Err(TodoError::Duplicate(text));
        }
        let index = self.position(id).ok_or(TodoError::NotFound(id))?;

        let mut next = self.todos.clone();
        next[index].text = text;
        let edited = next[index].clone();
        self.commit(next)?;

        info!("event=todo_edit module=todo_store status=ok id={}", id);
        Ok(edited)
    }

    /// Deletes one todo and hands it back.
    ///
    /// Unknown ids are a no-op returning `Ok(None)` without a write.
    pub fn remove(&mut self, id: TodoId) -> TodoResult<Option<Todo>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut next = self.todos.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(
            "event=todo_remove module=todo_store status=ok id={} count={}",
            id,
            self.todos.len()
        );
        Ok(Some(removed))
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn next_id(&self) -> TodoId {
        let now = self.clock.now_millis();
        match self.todos.iter().map(|todo| todo.id).max() {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        }
    }

    fn commit(&mut self, next: Vec<Todo>) -> TodoResult<()> {
        if let Err(err) = save_todos(&self.store, &next) {
            error!(
                "event=todos_save module=todo_store status=error error_code=store_write_failed error={}",
                err
            );
            return Err(err);
        }
        self.todos = next;
        Ok(())
    }
}
