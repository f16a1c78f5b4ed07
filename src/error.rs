//! Error types for ExpatHub policy evaluation.
//!
//! Pure policy functions never fail on bad data: malformed grants and records
//! fall back to the restrictive branch. Errors are reserved for caller misuse
//! and for grant sources that could not be reached.

use thiserror::Error;

/// Failures reported by a grant source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source could not be reached; a later attempt may succeed.
    #[error("Grant source unavailable: {message}")]
    Unavailable {
        /// Detail from the source.
        message: String,
    },

    /// The source answered with data that could not be decoded.
    #[error("Grant source returned malformed data: {message}")]
    Malformed {
        /// Detail from the decoder.
        message: String,
    },
}

impl SourceError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a malformed-data error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Returns true if a later refresh may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A severity string outside P0, P1, P2.
    #[error("Unknown severity '{value}', expected one of P0, P1, P2")]
    UnknownSeverity {
        /// The rejected input.
        value: String,
    },

    /// The sandbox override was requested but is not allowed.
    #[error("Sandbox override is disabled for this build")]
    SandboxDisabled,

    /// Configuration failed to parse or violates a threshold ordering.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },

    /// Refresh failed at the grant source.
    #[error("Grant source error: {0}")]
    Source(#[from] SourceError),
}

impl PolicyError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns true if this error came from the grant source.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Source(e) => e.is_transient(),
            Self::UnknownSeverity { .. } | Self::SandboxDisabled | Self::InvalidConfig { .. } => {
                false
            }
        }
    }
}

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
