//! Core domain logic for the offline todo list and the verse quiz.
//! Front ends render state from here; all business invariants live here.

pub mod clock;
pub mod config;
pub mod connectivity;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod quiz;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use connectivity::{
    Connectivity, ConnectivityMonitor, ConnectivityPlatform, ManualConnectivity, OFFLINE_BANNER,
};
pub use error::ErrorKind;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::ayah::{Ayah, QuranMeta, Surah};
pub use model::todo::{Todo, TodoId, TodoValidationError};
pub use quiz::{QuizDataError, QuizDataset, QuizSelector};
pub use service::auth_gate::{AuthError, AuthGate, AuthResult, AuthState, LoginFailure, SubmitOutcome};
pub use service::session::TodoSession;
pub use service::todo_store::{load_todos, save_todos, TodoError, TodoResult, TodoStore};
pub use store::{
    KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore, PASSWORD_KEY, TODOS_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
