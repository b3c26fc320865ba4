//! Context error types.

use thiserror::Error;

use crate::LifecycleState;

/// Errors raised by context lifecycle operations.
#[derive(Debug, Error)]
pub enum ContextError {
    /// An operation was called in the wrong lifecycle state.
    #[error("operation requires lifecycle state {expected:?}, context is {actual:?}")]
    IllegalState {
        expected: LifecycleState,
        actual: LifecycleState,
    },

    /// Session or flash serialization failed during dissolve.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised by session and flash collaborators.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session manager failed to produce a cookie token.
    #[error("failed to dissolve session state: {0}")]
    Dissolve(String),

    /// The session mapper failed to write the token into the response.
    #[error("failed to serialize session cookie: {0}")]
    Serialize(String),
}
