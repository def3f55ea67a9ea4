//! Login-guarded todo session.
//!
//! # Responsibility
//! - Compose the auth gate and the todo store over one key-value store.
//! - Make the todo list reachable only while authenticated.
//!
//! # Invariants
//! - `todos` is `Some` exactly when the gate is `Authenticated`.
//! - Logout drops the in-memory list; persisted data is untouched.
//! - A login whose todo list cannot be read does not authenticate.

use crate::clock::{Clock, SystemClock};
use crate::service::auth_gate::{AuthError, AuthGate, AuthResult, AuthState, SubmitOutcome};
use crate::service::todo_store::TodoStore;
use crate::store::KeyValueStore;
use log::warn;

/// One browser-tab-equivalent session.
pub struct TodoSession<S, C = SystemClock>
where
    S: KeyValueStore + Clone,
    C: Clock + Clone,
{
    store: S,
    clock: C,
    gate: AuthGate<S>,
    todos: Option<TodoStore<S, C>>,
}

impl<S: KeyValueStore + Clone> TodoSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, C> TodoSession<S, C>
where
    S: KeyValueStore + Clone,
    C: Clock + Clone,
{
    /// Creates a session in `Loading`; call [`TodoSession::start`] next.
    pub fn with_clock(store: S, clock: C) -> Self {
        let gate = AuthGate::new(store.clone());
        Self {
            store,
            clock,
            gate,
            todos: None,
        }
    }

    /// Reads the stored password and picks the login form variant.
    pub fn start(&mut self) -> AuthResult<&AuthState> {
        self.todos = None;
        self.gate.load()
    }

    pub fn state(&self) -> &AuthState {
        self.gate.state()
    }

    pub fn gate(&self) -> &AuthGate<S> {
        &self.gate
    }

    /// Submits the login form and opens the todo list on success.
    ///
    /// A returning user gets the persisted list; a new user starts empty.
    ///
    /// # Errors
    /// - Gate errors from [`AuthGate::submit`].
    /// - `Storage` when the persisted list cannot be read; the session stays
    ///   locked in `ReturningUser`.
    pub fn submit_password(&mut self, password: &str) -> AuthResult<SubmitOutcome> {
        let outcome = self.gate.submit(password)?;
        let todos = match outcome {
            SubmitOutcome::LoggedIn => {
                match TodoStore::load_with_clock(self.store.clone(), self.clock.clone()) {
                    Ok(todos) => todos,
                    Err(err) => {
                        // Never authenticated over an unread list.
                        self.gate.logout()?;
                        warn!("event=session_open module=session status=error error_code=todos_unreadable");
                        return Err(AuthError::Storage(err));
                    }
                }
            }
            SubmitOutcome::PasswordCreated => {
                TodoStore::with_clock(self.store.clone(), self.clock.clone())
            }
        };
        self.todos = Some(todos);
        Ok(outcome)
    }

    pub fn change_password(&mut self, current: &str, next: &str) -> AuthResult<()> {
        self.gate.change_password(current, next)
    }

    pub fn logout(&mut self) -> AuthResult<()> {
        self.gate.logout()?;
        self.todos = None;
        Ok(())
    }

    /// Todo list of the authenticated session.
    pub fn todos(&self) -> Option<&TodoStore<S, C>> {
        self.todos.as_ref()
    }

    /// Mutable todo list; `InvalidState` unless authenticated.
    pub fn todos_mut(&mut self) -> AuthResult<&mut TodoStore<S, C>> {
        let state = self.gate.state().as_str();
        self.todos.as_mut().ok_or(AuthError::InvalidState {
            operation: "todos",
            state,
        })
    }
}
