//! Shared-password gate in front of the todo list.
//!
//! # Responsibility
//! - Decide between first-run password creation and login.
//! - Verify and replace the stored password.
//!
//! # Invariants
//! - The gate is always in exactly one [`AuthState`].
//! - A stored password is never blank.
//! - Passwords are compared with exact string equality and never logged.
//!
//! The password lives in clear text under [`PASSWORD_KEY`] to stay
//! compatible with the existing storage layout.

use crate::error::ErrorKind;
use crate::store::{KeyValueStore, KvError, PASSWORD_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Inline error shown on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    IncorrectPassword,
}

impl Display for LoginFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncorrectPassword => write!(f, "Incorrect password"),
        }
    }
}

/// Login flow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Stored password not read yet.
    Loading,
    /// No password stored; the next submit creates one.
    NewUser,
    /// A password exists; the next submit is a login attempt.
    ReturningUser { error: Option<LoginFailure> },
    Authenticated,
}

impl AuthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::NewUser => "new_user",
            Self::ReturningUser { .. } => "returning_user",
            Self::Authenticated => "authenticated",
        }
    }
}

/// Result of an accepted password submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First-run password was stored.
    PasswordCreated,
    /// Existing password matched.
    LoggedIn,
}

#[derive(Debug)]
pub enum AuthError {
    /// Login attempt with a wrong password.
    IncorrectPassword,
    /// Password change with a wrong current password.
    IncorrectCurrentPassword,
    /// Blank password on creation or change.
    EmptyPassword,
    /// Operation not valid in the current state.
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    Storage(KvError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncorrectPassword | Self::IncorrectCurrentPassword => ErrorKind::Auth,
            Self::EmptyPassword => ErrorKind::Validation,
            Self::InvalidState { .. } => ErrorKind::State,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncorrectPassword => write!(f, "Incorrect password"),
            Self::IncorrectCurrentPassword => write!(f, "Incorrect current password"),
            Self::EmptyPassword => write!(f, "New password cannot be empty!"),
            Self::InvalidState { operation, state } => {
                write!(f, "`{operation}` is not allowed while {state}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KvError> for AuthError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Password gate bound to a key-value store.
pub struct AuthGate<S: KeyValueStore> {
    store: S,
    state: AuthState,
}

impl<S: KeyValueStore> AuthGate<S> {
    /// Creates a gate in `Loading`; call [`AuthGate::load`] next.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: AuthState::Loading,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// Inline login error, when the last attempt failed.
    pub fn login_error(&self) -> Option<LoginFailure> {
        match self.state {
            AuthState::ReturningUser { error } => error,
            _ => None,
        }
    }

    /// Reads the stored password and leaves `Loading`.
    ///
    /// Missing or blank password moves to `NewUser`, otherwise to
    /// `ReturningUser`. Calling it again re-evaluates from storage.
    pub fn load(&mut self) -> AuthResult<&AuthState> {
        self.state = if self.stored_password()?.is_some() {
            AuthState::ReturningUser { error: None }
        } else {
            AuthState::NewUser
        };
        info!(
            "event=auth_load module=auth status=ok state={}",
            self.state.as_str()
        );
        Ok(&self.state)
    }

    /// Submits the login form.
    ///
    /// # Errors
    /// - `EmptyPassword` when creating a blank password.
    /// - `IncorrectPassword` on mismatch; the state keeps the inline error.
    /// - `InvalidState` in `Loading` or `Authenticated`.
    pub fn submit(&mut self, password: &str) -> AuthResult<SubmitOutcome> {
        match self.state {
            AuthState::NewUser => {
                if password.trim().is_empty() {
                    return Err(AuthError::EmptyPassword);
                }
                self.store.set(PASSWORD_KEY, password)?;
                self.state = AuthState::Authenticated;
                info!("event=auth_submit module=auth status=ok outcome=password_created");
                Ok(SubmitOutcome::PasswordCreated)
            }
            AuthState::ReturningUser { .. } => {
                let stored = self.stored_password()?;
                if stored.as_deref() == Some(password) {
                    self.state = AuthState::Authenticated;
                    info!("event=auth_submit module=auth status=ok outcome=logged_in");
                    Ok(SubmitOutcome::LoggedIn)
                } else {
                    self.state = AuthState::ReturningUser {
                        error: Some(LoginFailure::IncorrectPassword),
                    };
                    warn!("event=auth_submit module=auth status=rejected error_code=incorrect_password");
                    Err(AuthError::IncorrectPassword)
                }
            }
            AuthState::Loading | AuthState::Authenticated => Err(AuthError::InvalidState {
                operation: "submit",
                state: self.state.as_str(),
            }),
        }
    }

    /// Replaces the stored password after verifying the current one.
    ///
    /// # Errors
    /// - `InvalidState` unless authenticated.
    /// - `IncorrectCurrentPassword` when `current` does not match.
    /// - `EmptyPassword` when `next` is blank after trimming.
    pub fn change_password(&mut self, current: &str, next: &str) -> AuthResult<()> {
        if !self.is_authenticated() {
            return Err(AuthError::InvalidState {
                operation: "change_password",
                state: self.state.as_str(),
            });
        }
        if self.stored_password()?.as_deref() != Some(current) {
            warn!("event=auth_change module=auth status=rejected error_code=incorrect_current_password");
            return Err(AuthError::IncorrectCurrentPassword);
        }
        if next.trim().is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        self.store.set(PASSWORD_KEY, next)?;
        info!("event=auth_change module=auth status=ok");
        Ok(())
    }

    /// Leaves `Authenticated` for `ReturningUser` without an error.
    pub fn logout(&mut self) -> AuthResult<()> {
        if !self.is_authenticated() {
            return Err(AuthError::InvalidState {
                operation: "logout",
                state: self.state.as_str(),
            });
        }
        self.state = AuthState::ReturningUser { error: None };
        info!("event=auth_logout module=auth status=ok");
        Ok(())
    }

    fn stored_password(&self) -> AuthResult<Option<String>> {
        Ok(self
            .store
            .get(PASSWORD_KEY)?
            .filter(|password| !password.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthGate, AuthState};
    use crate::store::{MemoryKvStore, PASSWORD_KEY};

    #[test]
    fn blank_stored_password_counts_as_new_user() {
        let kv = MemoryKvStore::with_entries([(PASSWORD_KEY, "")]);
        let mut gate = AuthGate::new(&kv);
        assert_eq!(gate.load().unwrap(), &AuthState::NewUser);
    }

    #[test]
    fn submit_before_load_is_rejected() {
        let kv = MemoryKvStore::new();
        let mut gate = AuthGate::new(&kv);
        assert!(gate.submit("abc").is_err());
        assert_eq!(gate.state(), &AuthState::Loading);
    }
}
