//! Domain model for the todo list and the verse quiz datasets.
//!
//! # Responsibility
//! - Define the records persisted by the todo store.
//! - Define the read-only shapes of the quiz datasets.
//!
//! # Invariants
//! - A `Todo` is identified by its creation timestamp, never reused.
//! - Dataset records are immutable after load.

pub mod ayah;
pub mod todo;
