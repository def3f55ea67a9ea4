//! Error classification shared by the service layer.
//!
//! Every service error maps to one [`ErrorKind`] so front ends can render a
//! single inline message slot without matching on each enum.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty todo text or password.
    Validation,
    /// Case-insensitive todo text collision.
    Duplicate,
    /// Password mismatch on login or change.
    Auth,
    /// Operation issued in the wrong gate state or on a missing record.
    State,
    /// Key-value backend failure.
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Duplicate => "duplicate",
            Self::Auth => "auth",
            Self::State => "state",
            Self::Storage => "storage",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
