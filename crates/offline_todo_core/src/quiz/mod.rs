//! Verse randomizer quiz over static, read-only datasets.
//!
//! # Responsibility
//! - Load the verse list and chapter metadata once.
//! - Filter by selected juz (or derived chapters) and pick uniformly.
//!
//! # Invariants
//! - Datasets are never mutated after load.
//! - Picking from an empty candidate set yields no result, never a panic.

pub mod dataset;
pub mod selector;

pub use dataset::{QuizDataError, QuizDataResult, QuizDataset};
pub use selector::QuizSelector;
