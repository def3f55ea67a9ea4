//! Key-value persistence boundary.
//!
//! # Responsibility
//! - Define the synchronous string store contract used by the auth gate and
//!   the todo store.
//! - Provide a SQLite implementation and an in-process double.
//!
//! # Invariants
//! - Callers own serialization; the store only sees opaque strings.
//! - `get` of a missing key is `Ok(None)`, never an error.

pub mod kv_store;
pub mod memory;

pub use kv_store::{KeyValueStore, KvError, KvResult, SqliteKvStore};
pub use memory::MemoryKvStore;

/// Key holding the clear-text shared password.
pub const PASSWORD_KEY: &str = "todoAppPassword";
/// Key holding the JSON-serialized todo list.
pub const TODOS_KEY: &str = "todos";
