//! Item outcome definitions
//!
//! Every search result processed by the page walker ends in exactly one of
//! these states. Failures never abort the page; they are recorded and the
//! walker moves on.
use crate::crawler::FetchError;
use std::fmt;

/// Final state of one search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemOutcome {
    /// Fetched, normalized and committed
    Persisted,

    // ===== Error States =====
    /// The detail endpoint could not be reached or answered with an error status
    TransportFailed,

    /// The detail payload lacked a required field
    ParseFailed,

    /// The storage write failed and was rolled back
    PersistFailed,

    /// No identifier could be derived from the result's detail URL
    InvalidId,
}

impl ItemOutcome {
    /// Returns true if the item was not persisted
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Persisted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::TransportFailed => "transport_failed",
            Self::ParseFailed => "parse_failed",
            Self::PersistFailed => "persist_failed",
            Self::InvalidId => "invalid_id",
        }
    }
}

impl From<&FetchError> for ItemOutcome {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Transport { .. } | FetchError::Status { .. } => Self::TransportFailed,
            FetchError::Parse { .. } => Self::ParseFailed,
            FetchError::Persistence { .. } => Self::PersistFailed,
            FetchError::InvalidUrl { .. } => Self::InvalidId,
        }
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
