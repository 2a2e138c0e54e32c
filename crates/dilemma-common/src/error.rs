//! Error types for the Dilemma workspace
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using DilemmaError
pub type Result<T> = std::result::Result<T, DilemmaError>;

/// Unified error type for Dilemma operations
#[derive(Debug, Error)]
pub enum DilemmaError {
    // Partition preconditions
    #[error("Partition error: {0}")]
    Partition(#[from] PartitionError),

    // Simulation engine failures
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    // Checkpoint/output persistence failures
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Partition precondition violations
///
/// All of these are raised before any simulation work begins for the
/// affected unit.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("universe of {universe} elements cannot be split into teams of {team_size}")]
    UnevenTeams { universe: usize, team_size: usize },

    #[error("team size must be at least 1")]
    ZeroTeamSize,

    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("duplicate element: {0}")]
    DuplicateElement(String),

    #[error("malformed partition code: {0}")]
    MalformedCode(String),
}

/// Simulation engine failures
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("roster of {0} agents is too small for a tournament")]
    RosterTooSmall(usize),

    #[error("engine returned output for {actual} agents, expected {expected}")]
    MalformedOutput { expected: usize, actual: usize },

    #[error("evaluation of team [{team}] timed out after {limit_ms}ms")]
    Timeout { team: String, limit_ms: u64 },

    #[error("engine failure: {0}")]
    Failed(String),
}

impl EngineError {
    /// Timeouts are recoverable at the experiment runner; everything else
    /// aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Timeout { .. })
    }
}

/// Persistence failures
///
/// Fatal to the run, but previously written checkpoint files are never
/// touched afterwards.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed partition list: {0}")]
    MalformedPartitionList(String),
}

// Implement From for common external error types
impl From<serde_json::Error> for DilemmaError {
    fn from(err: serde_json::Error) -> Self {
        DilemmaError::Persist(PersistError::MalformedPartitionList(err.to_string()))
    }
}

impl From<std::io::Error> for DilemmaError {
    fn from(err: std::io::Error) -> Self {
        DilemmaError::Persist(PersistError::Write {
            path: "<unknown>".to_string(),
            source: err,
        })
    }
}

impl From<anyhow::Error> for DilemmaError {
    fn from(err: anyhow::Error) -> Self {
        DilemmaError::Internal(err.to_string())
    }
}
