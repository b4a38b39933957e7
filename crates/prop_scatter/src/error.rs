//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, missing placement prerequisites, capacity and retry limits,
//! unknown scene nodes, whitelist naming and parsing failures, IO, and generic errors.
//!
//! Re-creating something that already exists is not an error; see [`CreateOutcome`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("capacity exceeded: requested {requested} with {placed} already placed (max {max})")]
    CapacityExceeded {
        requested: usize,
        placed: usize,
        max: usize,
    },

    #[error("no free position found after {attempts} attempts")]
    OverlapLimitExceeded { attempts: u32 },

    #[error("unknown scene node {id}")]
    UnknownNode { id: u64 },

    #[error("invalid whitelist name '{0}'")]
    InvalidName(String),

    #[error("whitelist '{name}' is corrupt: {source}")]
    StoreCorrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

/// Outcome of an idempotent create operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The resource did not exist and was created.
    Created,
    /// The resource was already present; nothing changed.
    AlreadyExists,
}

impl CreateOutcome {
    pub fn is_created(self) -> bool {
        matches!(self, CreateOutcome::Created)
    }
}
