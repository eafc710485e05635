//! Error types for the simulation core.

use thiserror::Error;

use crate::session::SessionState;

/// A track or tire reference that is not in the closed catalogs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown track code: {0}")]
    UnknownTrack(String),

    #[error("unknown tire compound: {0}")]
    UnknownTire(String),

    #[error("invalid pit stop {0:?}, expected LAP:TIRE")]
    InvalidStop(String),

    #[error("planned stop before lap {lap} is outside the race (laps 1-{race_laps})")]
    StopOutOfRange { lap: u32, race_laps: u32 },

    #[error("more than one stop planned before lap {0}")]
    DuplicateStop(u32),
}

/// Errors surfaced by the session state machine and controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operation is not valid in the session's current state. The session
    /// is left untouched.
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors raised while loading a [`crate::config::SimConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// The live driver task has stopped and no longer accepts commands.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveError {
    #[error("live session has shut down")]
    Closed,
}

pub type SessionResult<T = ()> = Result<T, SessionError>;
