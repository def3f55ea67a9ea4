//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate key-value persistence into use-case level APIs.
//! - Keep front ends decoupled from storage details.

pub mod auth_gate;
pub mod session;
pub mod todo_store;
