//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHubError`] via `From` when crossing a port boundary.

use std::fmt;
use std::time::Duration;

/// Base error type shared by every layer.
#[derive(Debug, thiserror::Error)]
pub enum SmartHubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A requested item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A persistence backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A remote endpoint or message broker failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An outbound call did not complete within its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Violations of domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An identifier was empty or made only of whitespace.
    #[error("{0} must not be empty")]
    EmptyId(&'static str),

    /// A scenario was defined without a name.
    #[error("scenario name must not be empty")]
    EmptyName,

    /// A required field was absent from an incoming message.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// An enum-like field carried a value we do not know.
    #[error("unknown {kind} `{value}`")]
    UnknownVariant {
        /// Kind of the field, e.g. `"device type"`.
        kind: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Returned when a lookup does not match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of the missing item, e.g. `"Snapshot"`.
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

impl SmartHubError {
    /// Display this error followed by every cause in its source chain.
    #[must_use]
    pub fn chain(&self) -> ErrorChain<'_> {
        ErrorChain::new(self)
    }
}

/// Formats an error as `outer: cause: root cause`.
///
/// The top-level variants only name the failing layer, so logs use this to
/// keep the underlying cause visible.
pub struct ErrorChain<'a>(&'a (dyn std::error::Error + 'static));

impl<'a> ErrorChain<'a> {
    #[must_use]
    pub fn new(err: &'a (dyn std::error::Error + 'static)) -> Self {
        Self(err)
    }
}

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, ": {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}
