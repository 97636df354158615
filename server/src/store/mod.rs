//! The todo store: an ordered list of todos plus the id counter.
//!
//! # Design
//! `TodoStore` is a plain owned value with synchronous methods. The server
//! wraps it in a single `Arc<RwLock<_>>`, so every mutation runs its whole
//! read-modify-write under the write lock. Persistence is delegated to a
//! [`Backend`]; after each mutation the full list is saved, and if the save
//! fails the in-memory change is rolled back so the store and the backend
//! never disagree.
//!
//! Ids are issued from `next_id`, which only moves forward. Deleting the
//! highest id does not make it available again.

mod backend;

pub use backend::{Backend, FileBackend, MemoryBackend};

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;

use crate::model::{truthy, CreateTodo, Todo, UpdateTodo};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Input was missing or empty.
    #[error("{0}")]
    Validation(String),

    #[error("todo {0} not found")]
    NotFound(u64),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// Loaded data breaks a store invariant.
    #[error("stored todos are inconsistent: {0}")]
    Corrupt(String),

    #[error("no todo ids left to issue")]
    IdsExhausted,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct TodoStore {
    todos: Vec<Todo>,
    next_id: u64,
    backend: Box<dyn Backend>,
}

impl TodoStore {
    /// An empty store that keeps nothing beyond the process lifetime.
    pub fn in_memory() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
            backend: Box::new(MemoryBackend),
        }
    }

    /// Load existing todos from `backend` and resume the id counter after
    /// the highest id found.
    ///
    /// Duplicate ids, and an id too large to have a successor, are rejected.
    pub fn open(backend: impl Backend + 'static) -> StoreResult<Self> {
        let todos = backend.load()?;

        let mut seen = HashSet::with_capacity(todos.len());
        if let Some(dup) = todos.iter().find(|t| !seen.insert(t.id)) {
            return Err(StoreError::Corrupt(format!("duplicate id {}", dup.id)));
        }

        let next_id = match todos.iter().map(|t| t.id).max() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| StoreError::Corrupt(format!("id {max} leaves no room for more")))?,
        };
        Ok(Self {
            todos,
            next_id,
            backend: Box::new(backend),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// All todos in insertion order.
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: u64) -> StoreResult<&Todo> {
        self.todos
            .iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn create(&mut self, input: CreateTodo) -> StoreResult<Todo> {
        let (Some(title), Some(description)) = (trimmed(input.title), trimmed(input.description))
        else {
            return Err(StoreError::Validation(
                "Title and description are required".to_string(),
            ));
        };

        let following = self.next_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        let todo = Todo {
            id: self.next_id,
            title,
            description,
            completed: false,
            due_date: input.due_date,
            created_at: Utc::now(),
        };
        self.todos.push(todo.clone());
        self.commit(|todos| {
            todos.pop();
        })?;
        self.next_id = following;

        tracing::debug!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Apply the fields present in `patch` to the todo with `id`.
    ///
    /// The whole patch is validated before anything is written, so a
    /// rejected update leaves the todo untouched.
    pub fn update(&mut self, id: u64, patch: UpdateTodo) -> StoreResult<Todo> {
        let index = self.position(id)?;
        let mut updated = self.todos[index].clone();

        if let Some(title) = patch.title {
            updated.title = trimmed(Some(title))
                .ok_or_else(|| StoreError::Validation("Title must not be empty".to_string()))?;
        }
        if let Some(description) = patch.description {
            updated.description = trimmed(Some(description)).ok_or_else(|| {
                StoreError::Validation("Description must not be empty".to_string())
            })?;
        }
        if let Some(completed) = patch.completed {
            updated.completed = truthy(&completed);
        }
        if let Some(due_date) = patch.due_date {
            updated.due_date = due_date;
        }

        let previous = std::mem::replace(&mut self.todos[index], updated.clone());
        self.commit(|todos| todos[index] = previous)?;

        tracing::debug!(id, "todo updated");
        Ok(updated)
    }

    pub fn delete(&mut self, id: u64) -> StoreResult<Todo> {
        let index = self.position(id)?;
        let removed = self.todos.remove(index);
        self.commit(|todos| todos.insert(index, removed.clone()))?;

        tracing::debug!(id, "todo deleted");
        Ok(removed)
    }

    fn position(&self, id: u64) -> StoreResult<usize> {
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Persist the current list, undoing the pending change on failure.
    fn commit(&mut self, rollback: impl FnOnce(&mut Vec<Todo>)) -> StoreResult<()> {
        if let Err(err) = self.backend.save(&self.todos) {
            rollback(&mut self.todos);
            return Err(err);
        }
        Ok(())
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
